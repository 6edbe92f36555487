//! Permission, ACL and extended-attribute values carried by events.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Permission bits for one class of user (`rwx`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FsAction {
    None,
    Execute,
    Write,
    WriteExecute,
    Read,
    ReadExecute,
    ReadWrite,
    All,
}

impl FsAction {
    /// Build from the low three bits of a mode.
    pub fn from_bits(bits: u16) -> Self {
        match bits & 0o7 {
            0 => FsAction::None,
            1 => FsAction::Execute,
            2 => FsAction::Write,
            3 => FsAction::WriteExecute,
            4 => FsAction::Read,
            5 => FsAction::ReadExecute,
            6 => FsAction::ReadWrite,
            _ => FsAction::All,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            FsAction::None => 0,
            FsAction::Execute => 1,
            FsAction::Write => 2,
            FsAction::WriteExecute => 3,
            FsAction::Read => 4,
            FsAction::ReadExecute => 5,
            FsAction::ReadWrite => 6,
            FsAction::All => 7,
        }
    }

    /// True if every bit of `other` is granted by `self`.
    pub fn implies(self, other: FsAction) -> bool {
        self.bits() & other.bits() == other.bits()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FsAction::None => "---",
            FsAction::Execute => "--x",
            FsAction::Write => "-w-",
            FsAction::WriteExecute => "-wx",
            FsAction::Read => "r--",
            FsAction::ReadExecute => "r-x",
            FsAction::ReadWrite => "rw-",
            FsAction::All => "rwx",
        }
    }
}

impl fmt::Display for FsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

const STICKY_BIT: u16 = 0o1000;

/// POSIX-style permission mode of a namespace node.
///
/// Carried as a snapshot inside events; serialized as the numeric mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FsPermission(u16);

impl FsPermission {
    pub fn new(mode: u16) -> Self {
        Self(mode)
    }

    pub fn mode(self) -> u16 {
        self.0
    }

    pub fn user_action(self) -> FsAction {
        FsAction::from_bits(self.0 >> 6)
    }

    pub fn group_action(self) -> FsAction {
        FsAction::from_bits(self.0 >> 3)
    }

    pub fn other_action(self) -> FsAction {
        FsAction::from_bits(self.0)
    }

    pub fn sticky_bit(self) -> bool {
        self.0 & STICKY_BIT != 0
    }
}

impl From<u16> for FsPermission {
    fn from(mode: u16) -> Self {
        Self(mode)
    }
}

impl fmt::Display for FsPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let other = self.other_action().symbol();
        write!(f, "{}{}", self.user_action(), self.group_action())?;
        if self.sticky_bit() {
            let exec = if self.other_action().implies(FsAction::Execute) { 't' } else { 'T' };
            write!(f, "{}{}", &other[..2], exec)
        } else {
            f.write_str(other)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclEntryScope {
    /// Applies to the node itself.
    Access,
    /// Inherited by children created under a directory.
    Default,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclEntryType {
    User,
    Group,
    Mask,
    Other,
}

impl fmt::Display for AclEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AclEntryType::User => "user",
            AclEntryType::Group => "group",
            AclEntryType::Mask => "mask",
            AclEntryType::Other => "other",
        })
    }
}

/// One entry of an access control list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct AclEntry {
    pub scope: AclEntryScope,
    pub entry_type: AclEntryType,
    /// Named user or group; `None` for the owning user/group, mask and other.
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(with = "Option<String>")]
    pub name: Option<String>,
    pub permission: FsAction,
}

impl AclEntry {
    pub fn new(
        scope: AclEntryScope,
        entry_type: AclEntryType,
        name: Option<String>,
        permission: FsAction,
    ) -> Self {
        Self {
            scope,
            entry_type,
            name,
            permission,
        }
    }
}

impl fmt::Display for AclEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope == AclEntryScope::Default {
            f.write_str("default:")?;
        }
        write!(
            f,
            "{}:{}:{}",
            self.entry_type,
            self.name.as_deref().unwrap_or(""),
            self.permission
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum XAttrNamespace {
    User,
    Trusted,
    Security,
    System,
    Raw,
}

impl XAttrNamespace {
    pub fn prefix(self) -> &'static str {
        match self {
            XAttrNamespace::User => "user",
            XAttrNamespace::Trusted => "trusted",
            XAttrNamespace::Security => "security",
            XAttrNamespace::System => "system",
            XAttrNamespace::Raw => "raw",
        }
    }
}

/// Extended attribute attached to a node.
///
/// The value is hex-encoded on the wire. A removal event lists the
/// attributes by name and usually carries no value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct XAttr {
    pub namespace: XAttrNamespace,
    pub name: String,
    #[serde(with = "hex_value")]
    #[schemars(with = "Option<String>")]
    pub value: Option<Vec<u8>>,
}

impl XAttr {
    pub fn new(namespace: XAttrNamespace, name: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self {
            namespace,
            name: name.into(),
            value,
        }
    }

    /// Namespace-qualified name, e.g. `user.checksum`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace.prefix(), self.name)
    }
}

impl fmt::Display for XAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace.prefix(), self.name)
    }
}

mod hex_value {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_some(&hex::encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
