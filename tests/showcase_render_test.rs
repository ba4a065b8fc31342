#![cfg(feature = "integration-tests")]

use starscape::{flow, showcase};

#[test]
fn showcase_draws_over_the_clear_colour() {
    flow::run(vec![showcase::constructor()]).expect("Failed to run the showcase");
}
