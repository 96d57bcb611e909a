pub(crate) mod answers;
pub(crate) mod attempts;
pub(crate) mod categories;
pub(crate) mod exams;
pub(crate) mod health;
pub(crate) mod questions;
pub(crate) mod users;
