pub mod catalog;
pub mod json_templates;
pub mod webserver;
