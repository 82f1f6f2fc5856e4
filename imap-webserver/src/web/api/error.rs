use super::json_error_response;
use anyhow::anyhow;
pub use imap_core::{repositories::Error as RepoError, usecases::Error as ParameterError};
use rocket::{
    self,
    http::Status,
    response::{self, Responder},
    serde::json::Error as JsonError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("{0}")]
    OtherWithStatus(#[source] anyhow::Error, Status),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<JsonError<'_>> for Error {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io(err) => Self::OtherWithStatus(anyhow!(err), Status::UnprocessableEntity),
            JsonError::Parse(_str, err) => {
                Self::OtherWithStatus(anyhow!(err), Status::UnprocessableEntity)
            }
        }
    }
}

impl From<RepoError> for Error {
    fn from(err: RepoError) -> Self {
        ParameterError::from(err).into()
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &rocket::Request) -> response::Result<'o> {
        match self {
            Error::Parameter(err) => match err {
                ParameterError::Repo(RepoError::NotFound) => {
                    json_error_response(req, &err, Status::NotFound)
                }
                ParameterError::Repo(RepoError::AlreadyExists) => {
                    json_error_response(req, &err, Status::Conflict)
                }
                ParameterError::Repo(err) => {
                    error!("Error: {err}");
                    Err(Status::InternalServerError)
                }
                _ => json_error_response(req, &err, Status::BadRequest),
            },
            Error::OtherWithStatus(err, status) => json_error_response(req, &err, status),
            Error::Other(err) => {
                error!("Error: {err}");
                Err(Status::InternalServerError)
            }
        }
    }
}
