use std::fmt;

/// Possible reasons for a single input record to be rejected. All of these
/// are recoverable: the record is dropped, a diagnostic is logged, and
/// processing continues with the next record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoaError {
    /// The prefix is missing, is not a string, or cannot be parsed as an IP
    /// prefix in CIDR notation.
    MalformedPrefix(String),
    /// The origin AS number cannot be parsed, or is outside of the range of
    /// a 32-bit AS number.
    MalformedAsn(String),
    /// The max length is missing, or is not a non-negative integer.
    MalformedMaxLength(String),
}

impl std::error::Error for RoaError {}

impl fmt::Display for RoaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoaError::MalformedPrefix(s) => {
                write!(f, "Error: Prefix malformed: {}", s)
            }
            RoaError::MalformedAsn(s) => {
                write!(f, "Error: ASN malformed: {}", s)
            }
            RoaError::MalformedMaxLength(s) => {
                write!(f, "Error: Max length malformed: {}", s)
            }
        }
    }
}

/// Errors that abort a complete run. None of these are retried.
#[derive(Debug)]
pub enum LoadError {
    /// The address family selector is not one of `ipv4`, `ipv6`, `mixed`.
    InvalidAfi(String),
    /// The AS number filter contains an item that is not an AS number.
    InvalidAsnFilter(String),
    /// Reading the export failed.
    Io(std::io::Error),
    /// The export is not a JSON document with a `roas` list.
    Json(serde_json::Error),
    /// Building the prefix tree failed.
    Tree(TreeError),
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Json(err) => Some(err),
            LoadError::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::InvalidAfi(s) => write!(
                f,
                "Error: afi must be 'ipv4', 'ipv6' or 'mixed', got '{}'",
                s
            ),
            LoadError::InvalidAsnFilter(s) => {
                write!(f, "Error: invalid AS number in filter: '{}'", s)
            }
            LoadError::Io(err) => {
                write!(f, "Error: cannot read the RPKI export: {}", err)
            }
            LoadError::Json(err) => {
                write!(f, "Error: cannot parse the RPKI export: {}", err)
            }
            LoadError::Tree(err) => write!(f, "{}", err),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err)
    }
}

impl From<TreeError> for LoadError {
    fn from(err: TreeError) -> Self {
        LoadError::Tree(err)
    }
}

/// Errors returned by methods on the prefix tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The specified prefix length cannot exist in the address family of
    /// the tree.
    PrefixLengthInvalid,
    /// A node index refers to a node that does not exist. The tree is
    /// corrupt.
    NodeNotFound,
    /// The tree holds as many nodes as a node index can address.
    TreeFull,
}

impl std::error::Error for TreeError {}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreeError::PrefixLengthInvalid => {
                write!(f, "Error: The specified Prefix length is invalid.")
            }
            TreeError::NodeNotFound => write!(f, "Error: Node not found."),
            TreeError::TreeFull => {
                write!(f, "Error: The tree cannot hold any more nodes.")
            }
        }
    }
}
