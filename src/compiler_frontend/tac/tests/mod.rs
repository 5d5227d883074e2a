
mod tac_display_tests;
