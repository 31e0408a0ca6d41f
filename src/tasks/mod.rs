pub mod holiday_query;
