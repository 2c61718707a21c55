pub mod forecast_request;
pub mod forecast_table;
