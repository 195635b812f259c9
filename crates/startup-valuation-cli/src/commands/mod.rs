pub mod risk;
pub mod rounds;
pub mod valuation;
