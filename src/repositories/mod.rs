pub(crate) mod chapters;
pub(crate) mod class_subjects;
pub(crate) mod classes;
pub(crate) mod papers;
pub(crate) mod profiles;
pub(crate) mod questions;
pub(crate) mod subjects;
pub(crate) mod topics;
