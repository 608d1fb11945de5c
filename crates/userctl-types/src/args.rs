use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Add,
    FindById,
    Remove,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Add => "add",
            Operation::FindById => "findById",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carrying the operation name that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Operation::List),
            "add" => Ok(Operation::Add),
            "findById" => Ok(Operation::FindById),
            "remove" => Ok(Operation::Remove),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// Raw parameters of a single invocation. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    pub operation: Option<String>,
    pub file_name: Option<String>,
    pub item: Option<String>,
    pub id: Option<String>,
}

impl Arguments {
    pub fn operation(&self) -> Option<&str> {
        non_empty(&self.operation)
    }

    pub fn file_name(&self) -> Option<&str> {
        non_empty(&self.file_name)
    }

    pub fn item(&self) -> Option<&str> {
        non_empty(&self.item)
    }

    pub fn id(&self) -> Option<&str> {
        non_empty(&self.id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
