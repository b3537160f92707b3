mod project;

pub use project::{Project, ProjectId, ProjectInput};
