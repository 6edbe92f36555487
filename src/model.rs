//! The namespace change-notification event model.
//!
//! An [`Event`] is one namespace mutation: a create, close, append, rename,
//! metadata update, unlink or truncate. The enum tag is the discriminator,
//! so a kind can never be paired with another kind's fields. Events are
//! immutable once built: every variant keeps its fields private behind
//! accessors.
//!
//! Variants with optional fields are assembled through a builder whose
//! `build` consumes it; [`CloseEvent`] and [`TruncateEvent`] take every
//! field in `new`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::perms::{AclEntry, FsPermission, XAttr};

/// Discriminator naming which variant an event is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Create,
    Close,
    Append,
    Rename,
    Metadata,
    Unlink,
    Truncate,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Create,
        EventKind::Close,
        EventKind::Append,
        EventKind::Rename,
        EventKind::Metadata,
        EventKind::Unlink,
        EventKind::Truncate,
    ];

    /// Wire name of the kind, as written in the `kind` field of a record.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Create => "CREATE",
            EventKind::Close => "CLOSE",
            EventKind::Append => "APPEND",
            EventKind::Rename => "RENAME",
            EventKind::Metadata => "METADATA",
            EventKind::Unlink => "UNLINK",
            EventKind::Truncate => "TRUNCATE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the known event kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized event kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A single namespace mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// A file, directory or symlink was created (including overwrite).
    Create(CreateEvent),
    /// A file was closed after create or append.
    Close(CloseEvent),
    /// An existing file was reopened for append.
    Append(AppendEvent),
    /// A node of any type was moved.
    Rename(RenameEvent),
    /// One metadata aspect of a file or directory changed.
    #[serde(rename = "METADATA")]
    MetadataUpdate(MetadataUpdateEvent),
    /// A node of any type was deleted.
    Unlink(UnlinkEvent),
    /// A file was truncated.
    Truncate(TruncateEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Create(_) => EventKind::Create,
            Event::Close(_) => EventKind::Close,
            Event::Append(_) => EventKind::Append,
            Event::Rename(_) => EventKind::Rename,
            Event::MetadataUpdate(_) => EventKind::Metadata,
            Event::Unlink(_) => EventKind::Unlink,
            Event::Truncate(_) => EventKind::Truncate,
        }
    }

    /// The path the event is about. For a rename this is the source.
    pub fn path(&self) -> &str {
        match self {
            Event::Create(e) => e.path(),
            Event::Close(e) => e.path(),
            Event::Append(e) => e.path(),
            Event::Rename(e) => e.src_path(),
            Event::MetadataUpdate(e) => e.path(),
            Event::Unlink(e) => e.path(),
            Event::Truncate(e) => e.path(),
        }
    }

    /// When the event happened, for variants that carry their own time.
    ///
    /// Append carries no time; a metadata update's mtime/atime describe
    /// the node, not the event.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Event::Create(e) => Some(e.ctime()),
            Event::Close(e) => Some(e.timestamp()),
            Event::Rename(e) => Some(e.timestamp()),
            Event::Unlink(e) => Some(e.timestamp()),
            Event::Truncate(e) => Some(e.timestamp()),
            Event::Append(_) | Event::MetadataUpdate(_) => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Create(e) => {
                write!(f, "CREATE {} {} {}:{} {}", e.inode_type(), e.path(), e.owner_name(), e.group_name(), e.perms())?;
                if let Some(target) = e.symlink_target() {
                    write!(f, " -> {target}")?;
                }
                Ok(())
            }
            Event::Close(e) => match e.known_file_size() {
                Some(size) => write!(f, "CLOSE {} size={size}", e.path()),
                None => write!(f, "CLOSE {} size=unknown", e.path()),
            },
            Event::Append(e) => write!(f, "APPEND {} new_block={}", e.path(), e.to_new_block()),
            Event::Rename(e) => write!(f, "RENAME {} -> {}", e.src_path(), e.dst_path()),
            Event::MetadataUpdate(e) => write!(f, "METADATA {} {}", e.metadata_type(), e.path()),
            Event::Unlink(e) => write!(f, "UNLINK {}", e.path()),
            Event::Truncate(e) => write!(f, "TRUNCATE {} size={}", e.path(), e.file_size()),
        }
    }
}

impl From<CreateEvent> for Event {
    fn from(e: CreateEvent) -> Self {
        Event::Create(e)
    }
}

impl From<CloseEvent> for Event {
    fn from(e: CloseEvent) -> Self {
        Event::Close(e)
    }
}

impl From<AppendEvent> for Event {
    fn from(e: AppendEvent) -> Self {
        Event::Append(e)
    }
}

impl From<RenameEvent> for Event {
    fn from(e: RenameEvent) -> Self {
        Event::Rename(e)
    }
}

impl From<MetadataUpdateEvent> for Event {
    fn from(e: MetadataUpdateEvent) -> Self {
        Event::MetadataUpdate(e)
    }
}

impl From<UnlinkEvent> for Event {
    fn from(e: UnlinkEvent) -> Self {
        Event::Unlink(e)
    }
}

impl From<TruncateEvent> for Event {
    fn from(e: TruncateEvent) -> Self {
        Event::Truncate(e)
    }
}

// =============================================================================
// Create
// =============================================================================

/// Type of a newly created node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum INodeType {
    File,
    Directory,
    Symlink,
}

impl fmt::Display for INodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            INodeType::File => "FILE",
            INodeType::Directory => "DIRECTORY",
            INodeType::Symlink => "SYMLINK",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreateEvent {
    inode_type: INodeType,
    path: String,
    ctime: i64,
    replication: i32,
    owner_name: String,
    group_name: String,
    perms: FsPermission,
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(with = "Option<String>")]
    symlink_target: Option<String>,
    overwrite: bool,
    default_block_size: i64,
}

impl CreateEvent {
    pub fn builder(inode_type: INodeType, path: impl Into<String>) -> CreateEventBuilder {
        CreateEventBuilder {
            inode_type,
            path: path.into(),
            ctime: 0,
            replication: 0,
            owner_name: String::new(),
            group_name: String::new(),
            perms: FsPermission::default(),
            symlink_target: None,
            overwrite: false,
            default_block_size: 0,
        }
    }

    pub fn inode_type(&self) -> INodeType {
        self.inode_type
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Creation time of the file, directory, or symlink.
    pub fn ctime(&self) -> i64 {
        self.ctime
    }

    /// Zero for directories and symlinks.
    pub fn replication(&self) -> i32 {
        self.replication
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn perms(&self) -> FsPermission {
        self.perms
    }

    /// `None` unless the node is a symlink.
    pub fn symlink_target(&self) -> Option<&str> {
        self.symlink_target.as_deref()
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn default_block_size(&self) -> i64 {
        self.default_block_size
    }
}

/// Builder for [`CreateEvent`].
#[derive(Debug)]
pub struct CreateEventBuilder {
    inode_type: INodeType,
    path: String,
    ctime: i64,
    replication: i32,
    owner_name: String,
    group_name: String,
    perms: FsPermission,
    symlink_target: Option<String>,
    overwrite: bool,
    default_block_size: i64,
}

impl CreateEventBuilder {
    pub fn ctime(mut self, ctime: i64) -> Self {
        self.ctime = ctime;
        self
    }

    pub fn replication(mut self, replication: i32) -> Self {
        self.replication = replication;
        self
    }

    pub fn owner_name(mut self, owner: impl Into<String>) -> Self {
        self.owner_name = owner.into();
        self
    }

    pub fn group_name(mut self, group: impl Into<String>) -> Self {
        self.group_name = group.into();
        self
    }

    pub fn perms(mut self, perms: FsPermission) -> Self {
        self.perms = perms;
        self
    }

    pub fn symlink_target(mut self, target: impl Into<String>) -> Self {
        self.symlink_target = Some(target.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn default_block_size(mut self, size: i64) -> Self {
        self.default_block_size = size;
        self
    }

    pub fn build(self) -> CreateEvent {
        CreateEvent {
            inode_type: self.inode_type,
            path: self.path,
            ctime: self.ctime,
            replication: self.replication,
            owner_name: self.owner_name,
            group_name: self.group_name,
            perms: self.perms,
            symlink_target: self.symlink_target,
            overwrite: self.overwrite,
            default_block_size: self.default_block_size,
        }
    }
}

// =============================================================================
// Close
// =============================================================================

/// Size reported when the closed file's length is not known.
pub const UNKNOWN_FILE_SIZE: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CloseEvent {
    path: String,
    file_size: i64,
    timestamp: i64,
}

impl CloseEvent {
    pub fn new(path: impl Into<String>, file_size: i64, timestamp: i64) -> Self {
        Self {
            path: path.into(),
            file_size,
            timestamp,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Size of the closed file in bytes, or [`UNKNOWN_FILE_SIZE`] when not
    /// available (a close generated by concat, for example).
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    /// The file size, unless it is the unknown-size sentinel.
    pub fn known_file_size(&self) -> Option<i64> {
        (self.file_size != UNKNOWN_FILE_SIZE).then_some(self.file_size)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

// =============================================================================
// Append
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppendEvent {
    path: String,
    new_block: bool,
}

impl AppendEvent {
    pub fn builder(path: impl Into<String>) -> AppendEventBuilder {
        AppendEventBuilder {
            path: path.into(),
            new_block: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the append starts a new block rather than extending the last one.
    pub fn to_new_block(&self) -> bool {
        self.new_block
    }
}

#[derive(Debug)]
pub struct AppendEventBuilder {
    path: String,
    new_block: bool,
}

impl AppendEventBuilder {
    pub fn new_block(mut self, new_block: bool) -> Self {
        self.new_block = new_block;
        self
    }

    pub fn build(self) -> AppendEvent {
        AppendEvent {
            path: self.path,
            new_block: self.new_block,
        }
    }
}

// =============================================================================
// Rename
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RenameEvent {
    src_path: String,
    dst_path: String,
    timestamp: i64,
}

impl RenameEvent {
    pub fn builder(src_path: impl Into<String>, dst_path: impl Into<String>) -> RenameEventBuilder {
        RenameEventBuilder {
            src_path: src_path.into(),
            dst_path: dst_path.into(),
            timestamp: 0,
        }
    }

    pub fn src_path(&self) -> &str {
        &self.src_path
    }

    pub fn dst_path(&self) -> &str {
        &self.dst_path
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[derive(Debug)]
pub struct RenameEventBuilder {
    src_path: String,
    dst_path: String,
    timestamp: i64,
}

impl RenameEventBuilder {
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> RenameEvent {
        RenameEvent {
            src_path: self.src_path,
            dst_path: self.dst_path,
            timestamp: self.timestamp,
        }
    }
}

// =============================================================================
// Metadata update
// =============================================================================

/// The metadata aspect changed by a [`MetadataUpdateEvent`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataType {
    Times,
    Replication,
    Owner,
    Perms,
    Acls,
    Xattrs,
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetadataType::Times => "TIMES",
            MetadataType::Replication => "REPLICATION",
            MetadataType::Owner => "OWNER",
            MetadataType::Perms => "PERMS",
            MetadataType::Acls => "ACLS",
            MetadataType::Xattrs => "XATTRS",
        })
    }
}

/// A change to one metadata aspect of a file or directory.
///
/// Only the fields belonging to [`metadata_type`](Self::metadata_type) carry
/// information; the rest stay at zero, empty or `None` and must not be read
/// as a change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MetadataUpdateEvent {
    path: String,
    metadata_type: MetadataType,
    mtime: i64,
    atime: i64,
    replication: i32,
    owner_name: String,
    group_name: String,
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(with = "Option<FsPermission>")]
    perms: Option<FsPermission>,
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(with = "Option<Vec<AclEntry>>")]
    acls: Option<Vec<AclEntry>>,
    #[serde(deserialize_with = "Option::deserialize")]
    #[schemars(with = "Option<Vec<XAttr>>")]
    x_attrs: Option<Vec<XAttr>>,
    x_attrs_removed: bool,
}

impl MetadataUpdateEvent {
    pub fn builder(path: impl Into<String>, metadata_type: MetadataType) -> MetadataUpdateEventBuilder {
        MetadataUpdateEventBuilder {
            path: path.into(),
            metadata_type,
            mtime: 0,
            atime: 0,
            replication: 0,
            owner_name: String::new(),
            group_name: String::new(),
            perms: None,
            acls: None,
            x_attrs: None,
            x_attrs_removed: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn metadata_type(&self) -> MetadataType {
        self.metadata_type
    }

    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    pub fn atime(&self) -> i64 {
        self.atime
    }

    pub fn replication(&self) -> i32 {
        self.replication
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn perms(&self) -> Option<FsPermission> {
        self.perms
    }

    /// The full ACL now attached to the node. `None` means every ACL entry
    /// was removed; `Some(&[])` is an explicitly empty list.
    pub fn acls(&self) -> Option<&[AclEntry]> {
        self.acls.as_deref()
    }

    pub fn x_attrs(&self) -> Option<&[XAttr]> {
        self.x_attrs.as_deref()
    }

    /// Whether the attributes in [`x_attrs`](Self::x_attrs) were removed
    /// rather than added. Only meaningful for [`MetadataType::Xattrs`].
    pub fn x_attrs_removed(&self) -> bool {
        self.x_attrs_removed
    }
}

#[derive(Debug)]
pub struct MetadataUpdateEventBuilder {
    path: String,
    metadata_type: MetadataType,
    mtime: i64,
    atime: i64,
    replication: i32,
    owner_name: String,
    group_name: String,
    perms: Option<FsPermission>,
    acls: Option<Vec<AclEntry>>,
    x_attrs: Option<Vec<XAttr>>,
    x_attrs_removed: bool,
}

impl MetadataUpdateEventBuilder {
    pub fn mtime(mut self, mtime: i64) -> Self {
        self.mtime = mtime;
        self
    }

    pub fn atime(mut self, atime: i64) -> Self {
        self.atime = atime;
        self
    }

    pub fn replication(mut self, replication: i32) -> Self {
        self.replication = replication;
        self
    }

    pub fn owner_name(mut self, owner: impl Into<String>) -> Self {
        self.owner_name = owner.into();
        self
    }

    pub fn group_name(mut self, group: impl Into<String>) -> Self {
        self.group_name = group.into();
        self
    }

    pub fn perms(mut self, perms: FsPermission) -> Self {
        self.perms = Some(perms);
        self
    }

    /// Pass `None` to record that all ACL entries were removed.
    pub fn acls(mut self, acls: Option<Vec<AclEntry>>) -> Self {
        self.acls = acls;
        self
    }

    pub fn x_attrs(mut self, x_attrs: Option<Vec<XAttr>>) -> Self {
        self.x_attrs = x_attrs;
        self
    }

    pub fn x_attrs_removed(mut self, removed: bool) -> Self {
        self.x_attrs_removed = removed;
        self
    }

    pub fn build(self) -> MetadataUpdateEvent {
        MetadataUpdateEvent {
            path: self.path,
            metadata_type: self.metadata_type,
            mtime: self.mtime,
            atime: self.atime,
            replication: self.replication,
            owner_name: self.owner_name,
            group_name: self.group_name,
            perms: self.perms,
            acls: self.acls,
            x_attrs: self.x_attrs,
            x_attrs_removed: self.x_attrs_removed,
        }
    }
}

// =============================================================================
// Unlink
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnlinkEvent {
    path: String,
    timestamp: i64,
}

impl UnlinkEvent {
    pub fn builder(path: impl Into<String>) -> UnlinkEventBuilder {
        UnlinkEventBuilder {
            path: path.into(),
            timestamp: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[derive(Debug)]
pub struct UnlinkEventBuilder {
    path: String,
    timestamp: i64,
}

impl UnlinkEventBuilder {
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> UnlinkEvent {
        UnlinkEvent {
            path: self.path,
            timestamp: self.timestamp,
        }
    }
}

// =============================================================================
// Truncate
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TruncateEvent {
    path: String,
    file_size: i64,
    timestamp: i64,
}

impl TruncateEvent {
    pub fn new(path: impl Into<String>, file_size: i64, timestamp: i64) -> Self {
        Self {
            path: path.into(),
            file_size,
            timestamp,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Exact size of the file after truncation.
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Generate JSON Schema for the Event type.
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(Event);
    serde_json::to_string_pretty(&schema).expect("failed to serialize schema")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perms::{AclEntryScope, AclEntryType, FsAction};
    use pretty_assertions::assert_eq;

    #[test]
    fn create_file_keeps_every_field() {
        let event = CreateEvent::builder(INodeType::File, "/a/b")
            .ctime(1000)
            .replication(3)
            .owner_name("u")
            .group_name("g")
            .perms(FsPermission::new(0o644))
            .overwrite(false)
            .default_block_size(134_217_728)
            .build();

        assert_eq!(event.inode_type(), INodeType::File);
        assert_eq!(event.path(), "/a/b");
        assert_eq!(event.ctime(), 1000);
        assert_eq!(event.replication(), 3);
        assert_eq!(event.owner_name(), "u");
        assert_eq!(event.group_name(), "g");
        assert_eq!(event.perms().mode(), 0o644);
        assert!(!event.overwrite());
        assert_eq!(event.default_block_size(), 134_217_728);
        assert_eq!(event.symlink_target(), None);
    }

    #[test]
    fn create_defaults() {
        let dir = CreateEvent::builder(INodeType::Directory, "/d").ctime(7).build();
        assert_eq!(dir.replication(), 0);
        assert_eq!(dir.default_block_size(), 0);
        assert!(!dir.overwrite());
        assert_eq!(dir.symlink_target(), None);
        assert_eq!(dir.perms(), FsPermission::default());
        assert_eq!(dir.owner_name(), "");
    }

    #[test]
    fn symlink_carries_target() {
        let link = CreateEvent::builder(INodeType::Symlink, "/l")
            .symlink_target("/target")
            .build();
        assert_eq!(link.symlink_target(), Some("/target"));
        assert_eq!(link.replication(), 0);
    }

    #[test]
    fn rename_paths_are_not_normalized() {
        let event = RenameEvent::builder("/old", "/new").timestamp(5000).build();
        assert_eq!(event.src_path(), "/old");
        assert_eq!(event.dst_path(), "/new");
        assert_eq!(event.timestamp(), 5000);

        let odd = RenameEvent::builder("/a//b/", "/c/./d").build();
        assert_eq!(odd.src_path(), "/a//b/");
        assert_eq!(odd.dst_path(), "/c/./d");
    }

    #[test]
    fn acl_removal_differs_from_empty_list() {
        let removed = MetadataUpdateEvent::builder("/x", MetadataType::Acls)
            .acls(None)
            .build();
        let emptied = MetadataUpdateEvent::builder("/x", MetadataType::Acls)
            .acls(Some(vec![]))
            .build();

        assert_eq!(removed.acls(), None);
        assert_eq!(emptied.acls(), Some(&[][..]));
        assert_ne!(removed, emptied);
    }

    #[test]
    fn metadata_defaults_are_inert() {
        let entry = AclEntry::new(AclEntryScope::Access, AclEntryType::User, Some("bob".into()), FsAction::Read);
        let event = MetadataUpdateEvent::builder("/f", MetadataType::Acls)
            .acls(Some(vec![entry.clone()]))
            .build();
        assert_eq!(event.acls(), Some(&[entry][..]));
        assert_eq!(event.mtime(), 0);
        assert_eq!(event.atime(), 0);
        assert_eq!(event.replication(), 0);
        assert_eq!(event.perms(), None);
        assert_eq!(event.x_attrs(), None);
        assert!(!event.x_attrs_removed());
    }

    #[test]
    fn close_sentinel_is_not_a_size() {
        let unknown = CloseEvent::new("/f", UNKNOWN_FILE_SIZE, 10);
        assert_eq!(unknown.file_size(), -1);
        assert_eq!(unknown.known_file_size(), None);

        let known = CloseEvent::new("/f", 0, 10);
        assert_eq!(known.known_file_size(), Some(0));
    }

    #[test]
    fn kind_matches_variant() {
        let events: Vec<Event> = vec![
            CreateEvent::builder(INodeType::File, "/c").build().into(),
            CloseEvent::new("/c", 1, 2).into(),
            AppendEvent::builder("/c").new_block(true).build().into(),
            RenameEvent::builder("/c", "/d").build().into(),
            MetadataUpdateEvent::builder("/d", MetadataType::Times).build().into(),
            UnlinkEvent::builder("/d").timestamp(3).build().into(),
            TruncateEvent::new("/e", 0, 4).into(),
        ];
        let kinds: Vec<EventKind> = events.iter().map(Event::kind).collect();
        assert_eq!(kinds, EventKind::ALL.to_vec());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        assert_eq!(
            "SNAPSHOT".parse::<EventKind>(),
            Err(UnknownKind("SNAPSHOT".to_string()))
        );
    }

    #[test]
    fn event_time_and_path() {
        let rename: Event = RenameEvent::builder("/s", "/t").timestamp(9).build().into();
        assert_eq!(rename.path(), "/s");
        assert_eq!(rename.timestamp(), Some(9));

        let append: Event = AppendEvent::builder("/a").build().into();
        assert_eq!(append.timestamp(), None);
    }

    #[test]
    fn display_is_one_line() {
        let close: Event = CloseEvent::new("/f", -1, 1).into();
        assert_eq!(close.to_string(), "CLOSE /f size=unknown");

        let link: Event = CreateEvent::builder(INodeType::Symlink, "/l")
            .owner_name("u")
            .group_name("g")
            .perms(FsPermission::new(0o777))
            .symlink_target("/t")
            .build()
            .into();
        assert_eq!(link.to_string(), "CREATE SYMLINK /l u:g rwxrwxrwx -> /t");
    }

    #[test]
    fn schema_names_every_kind() {
        let schema = generate_schema();
        for kind in EventKind::ALL {
            assert!(schema.contains(kind.as_str()), "missing {kind}");
        }
    }
}
