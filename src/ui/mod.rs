pub mod components;
pub mod project_form;
pub mod projects;
