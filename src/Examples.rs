/// numbered demonstration runs of the SX twin
pub mod sx_examples;
