pub mod cache;
pub mod label_ops;
pub mod outcome;
pub mod project_ops;
pub mod query;
pub mod resolve;
pub mod section_ops;
pub mod task_ops;

#[cfg(test)]
pub mod test_helpers;
