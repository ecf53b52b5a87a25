pub mod json_templates;
