pub mod loop_einstein;
