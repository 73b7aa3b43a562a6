use super::cli_main::{flush, get_user_input};
use crate::Examples::sx_examples::sx_examples;

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. Three-stage plant at a fixed v/v%");
        println!("2. Extractant dosing for a target stripping ratio");
        println!("3. Blended PLS feed from several heaps");
        println!("4. Stage count comparison over the scenario catalog");
        println!("5. Backward sweep variants");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        flush();

        let Some(choice) = get_user_input() else {
            break;
        };
        match choice.trim() {
            "1" => sx_examples(0),
            "2" => sx_examples(1),
            "3" => sx_examples(2),
            "4" => sx_examples(3),
            "5" => sx_examples(4),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
