pub(crate) mod admin;
pub(crate) mod errors;
pub(crate) mod generation;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod validation;
