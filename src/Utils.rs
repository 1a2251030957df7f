//! different utility modules used throughout the project
/// logger setup and saving step traces into files
pub mod logger;
/// engine, logging and trace settings read from a task document
pub mod engine_settings;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
