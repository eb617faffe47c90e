use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, ReadContentError>;

/// Reads a schema or executable document from disk as UTF-8 text.
pub(crate) fn read_content(file_path: impl AsRef<Path>) -> Result<String> {
    let file_path = file_path.as_ref();
    let io_err = |err| ReadContentError::FileReadError {
        file_path: file_path.to_path_buf(),
        err,
    };

    let metadata = std::fs::metadata(file_path).map_err(io_err)?;
    if !metadata.is_file() {
        return Err(ReadContentError::PathIsNotAFile(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path).map_err(io_err)?;
    log::trace!("Read {} bytes from {file_path:?}.", bytes.len());
    String::from_utf8(bytes).map_err(|err| ReadContentError::FileDecodeError {
        file_path: file_path.to_path_buf(),
        err,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ReadContentError {
    #[error("{file_path:?} is not valid UTF-8: {err}")]
    FileDecodeError {
        file_path: PathBuf,
        err: std::string::FromUtf8Error,
    },

    #[error("Failed to read {file_path:?}: {err}")]
    FileReadError {
        file_path: PathBuf,
        err: std::io::Error,
    },

    #[error("{0:?} is not a file")]
    PathIsNotAFile(PathBuf),
}
impl ReadContentError {
    pub fn file_path(&self) -> &Path {
        match self {
            Self::FileDecodeError { file_path, .. }
                | Self::FileReadError { file_path, .. }
                | Self::PathIsNotAFile(file_path) => file_path,
        }
    }
}
// `std::io::Error` has no `PartialEq`; its kind stands in for it.
impl PartialEq for ReadContentError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::FileDecodeError { file_path: lhs_path, err: lhs_err },
                Self::FileDecodeError { file_path: rhs_path, err: rhs_err },
            ) => lhs_path == rhs_path && lhs_err == rhs_err,

            (
                Self::FileReadError { file_path: lhs_path, err: lhs_err },
                Self::FileReadError { file_path: rhs_path, err: rhs_err },
            ) => lhs_path == rhs_path && lhs_err.kind() == rhs_err.kind(),

            (Self::PathIsNotAFile(lhs_path), Self::PathIsNotAFile(rhs_path)) =>
                lhs_path == rhs_path,

            _ => false,
        }
    }
}
