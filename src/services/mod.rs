pub(crate) mod answer_key;
pub(crate) mod answers;
pub(crate) mod paper;
pub(crate) mod pdf;
pub(crate) mod question_selection;
pub(crate) mod quiz;
pub(crate) mod storage;
