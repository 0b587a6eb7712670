mod e2e_test;
mod market_test;
mod ratelog_test;
