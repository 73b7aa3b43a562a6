/// terminal (and optional file) logging for the binary
pub mod logger;
/// labeled metrics, plotting samples and the response document; CLI tables
pub mod report;
/// parsing of the inbound JSON request into a flat parameter map, scenario and mode
pub mod request;
