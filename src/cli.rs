/// example runs menu
pub mod cli_examples;
/// command-line arguments and the main interactive menu
pub mod cli_main;
/// interactive entry of a plant configuration
pub mod cli_plant;
