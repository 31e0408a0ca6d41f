pub mod booking;
pub mod form;
pub mod form_state;
pub mod holiday;
