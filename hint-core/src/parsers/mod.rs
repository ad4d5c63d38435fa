pub mod hint_file;
