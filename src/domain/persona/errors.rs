//! Persona Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("作者姓名不能为空")]
    NameRequired,
}
