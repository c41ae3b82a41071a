pub mod answer_store;

pub use answer_store::{AnswerStore, JsonFileAnswerStore, MemoryAnswerStore, SavedAnswers, StoreError};
