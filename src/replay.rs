//! Replaying an event stream into an in-memory namespace mirror.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::handler::EventHandler;
use crate::model::{
    AppendEvent, CloseEvent, CreateEvent, INodeType, MetadataType, MetadataUpdateEvent,
    RenameEvent, TruncateEvent, UnlinkEvent,
};
use crate::perms::{AclEntry, FsPermission};

/// Mirrored state of one node.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeState {
    pub inode_type: INodeType,
    /// Last known length; `None` for non-files or after a close of unknown size.
    pub size: Option<i64>,
    pub replication: i32,
    pub owner: String,
    pub group: String,
    pub perms: FsPermission,
    pub acls: Vec<AclEntry>,
    /// Extended attributes keyed by qualified name.
    pub xattrs: BTreeMap<String, Option<Vec<u8>>>,
    pub symlink_target: Option<String>,
    pub mtime: i64,
    pub atime: i64,
    pub open_for_write: bool,
}

impl NodeState {
    fn from_create(e: &CreateEvent) -> Self {
        let is_file = e.inode_type() == INodeType::File;
        Self {
            inode_type: e.inode_type(),
            size: is_file.then_some(0),
            replication: e.replication(),
            owner: e.owner_name().to_string(),
            group: e.group_name().to_string(),
            perms: e.perms(),
            acls: Vec::new(),
            xattrs: BTreeMap::new(),
            symlink_target: e.symlink_target().map(str::to_string),
            mtime: e.ctime(),
            atime: e.ctime(),
            open_for_write: is_file,
        }
    }
}

/// Namespace image rebuilt from events in delivery order.
///
/// Paths are used verbatim as keys. Events for paths the image has never
/// seen (the stream began after their creation) are counted and skipped.
#[derive(Debug, Default, Serialize)]
pub struct NamespaceImage {
    nodes: BTreeMap<String, NodeState>,
    misses: u64,
}

impl NamespaceImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&NodeState> {
        self.nodes.get(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeState)> {
        self.nodes.iter().map(|(path, node)| (path.as_str(), node))
    }

    /// Events that named a path missing from the image.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut NodeState> {
        let node = self.nodes.get_mut(path);
        if node.is_none() {
            self.misses += 1;
            tracing::debug!(%path, "event for unknown path");
        }
        node
    }

    /// Keys of `path` and every node below it.
    fn subtree(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let mut keys: Vec<String> = self
            .nodes
            .contains_key(path)
            .then(|| path.to_string())
            .into_iter()
            .collect();
        keys.extend(
            self.nodes
                .range(prefix.clone()..)
                .map(|(key, _)| key)
                .take_while(|key| key.starts_with(&prefix))
                .cloned(),
        );
        keys
    }

    fn remove_subtree(&mut self, path: &str) -> usize {
        let keys = self.subtree(path);
        for key in &keys {
            self.nodes.remove(key);
        }
        keys.len()
    }

    /// Render the image as one `ls`-style line per node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (path, node) in &self.nodes {
            let size = match (node.inode_type, node.size) {
                (INodeType::File, Some(size)) => size.to_string(),
                (INodeType::File, None) => "?".to_string(),
                _ => "-".to_string(),
            };
            out.push_str(&format!(
                "{:<9} {:>12} {} {}:{} {}",
                node.inode_type.to_string(),
                size,
                node.perms,
                node.owner,
                node.group,
                path
            ));
            if let Some(target) = &node.symlink_target {
                out.push_str(&format!(" -> {target}"));
            }
            out.push('\n');
        }
        out
    }
}

impl EventHandler for NamespaceImage {
    fn on_create(&mut self, event: &CreateEvent) {
        let path = event.path();
        // Overwriting a directory replaces whatever was below it.
        self.remove_subtree(path);
        self.nodes.insert(path.to_string(), NodeState::from_create(event));
    }

    fn on_close(&mut self, event: &CloseEvent) {
        let Some(node) = self.node_mut(event.path()) else {
            return;
        };
        node.open_for_write = false;
        node.size = event.known_file_size();
        node.mtime = event.timestamp();
    }

    fn on_append(&mut self, event: &AppendEvent) {
        if let Some(node) = self.node_mut(event.path()) {
            node.open_for_write = true;
        }
    }

    fn on_rename(&mut self, event: &RenameEvent) {
        let (src, dst) = (event.src_path(), event.dst_path());
        let keys = self.subtree(src);
        if keys.is_empty() {
            self.misses += 1;
            tracing::debug!(%src, %dst, "rename of unknown path");
            return;
        }
        let moved: Vec<(String, NodeState)> = keys
            .into_iter()
            .filter_map(|key| self.nodes.remove(&key).map(|node| (key, node)))
            .collect();
        self.remove_subtree(dst);
        let base = src.trim_end_matches('/');
        for (key, node) in moved {
            let renamed = if key == src {
                dst.to_string()
            } else {
                format!("{}{}", dst.trim_end_matches('/'), &key[base.len()..])
            };
            self.nodes.insert(renamed, node);
        }
    }

    fn on_metadata_update(&mut self, event: &MetadataUpdateEvent) {
        let Some(node) = self.node_mut(event.path()) else {
            return;
        };
        match event.metadata_type() {
            MetadataType::Times => {
                // Negative values mean the time was left unchanged.
                if event.mtime() >= 0 {
                    node.mtime = event.mtime();
                }
                if event.atime() >= 0 {
                    node.atime = event.atime();
                }
            }
            MetadataType::Replication => node.replication = event.replication(),
            MetadataType::Owner => {
                if !event.owner_name().is_empty() {
                    node.owner = event.owner_name().to_string();
                }
                if !event.group_name().is_empty() {
                    node.group = event.group_name().to_string();
                }
            }
            MetadataType::Perms => {
                if let Some(perms) = event.perms() {
                    node.perms = perms;
                }
            }
            MetadataType::Acls => {
                node.acls = event.acls().map(<[AclEntry]>::to_vec).unwrap_or_default();
            }
            MetadataType::Xattrs => {
                for attr in event.x_attrs().unwrap_or_default() {
                    if event.x_attrs_removed() {
                        node.xattrs.remove(&attr.qualified_name());
                    } else {
                        node.xattrs.insert(attr.qualified_name(), attr.value.clone());
                    }
                }
            }
        }
    }

    fn on_unlink(&mut self, event: &UnlinkEvent) {
        if self.remove_subtree(event.path()) == 0 {
            self.misses += 1;
            tracing::debug!(path = %event.path(), "unlink of unknown path");
        }
    }

    fn on_truncate(&mut self, event: &TruncateEvent) {
        if let Some(node) = self.node_mut(event.path()) {
            node.size = Some(event.file_size());
            node.mtime = event.timestamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::dispatch_event;
    use crate::model::{Event, UNKNOWN_FILE_SIZE};
    use crate::perms::{AclEntryScope, AclEntryType, FsAction, XAttr, XAttrNamespace};
    use pretty_assertions::assert_eq;

    fn replay(events: Vec<Event>) -> NamespaceImage {
        let mut image = NamespaceImage::new();
        for event in &events {
            dispatch_event(event, &mut image);
        }
        image
    }

    fn file(path: &str) -> Event {
        CreateEvent::builder(INodeType::File, path)
            .ctime(1)
            .replication(3)
            .owner_name("u")
            .group_name("g")
            .perms(FsPermission::new(0o644))
            .build()
            .into()
    }

    fn dir(path: &str) -> Event {
        CreateEvent::builder(INodeType::Directory, path).ctime(1).build().into()
    }

    #[test]
    fn create_close_truncate() {
        let image = replay(vec![
            file("/a"),
            CloseEvent::new("/a", 4096, 2).into(),
            TruncateEvent::new("/a", 10, 3).into(),
        ]);
        let node = image.get("/a").unwrap();
        assert_eq!(node.size, Some(10));
        assert!(!node.open_for_write);
        assert_eq!(node.mtime, 3);
    }

    #[test]
    fn unknown_close_size_is_not_recorded_as_a_size() {
        let image = replay(vec![
            file("/a"),
            CloseEvent::new("/a", UNKNOWN_FILE_SIZE, 2).into(),
        ]);
        assert_eq!(image.get("/a").unwrap().size, None);
    }

    #[test]
    fn rename_moves_subtree_and_replaces_destination() {
        let image = replay(vec![
            dir("/src"),
            file("/src/x"),
            dir("/src/sub"),
            file("/src/sub/y"),
            file("/srcfile"),
            dir("/dst"),
            file("/dst/old"),
            RenameEvent::builder("/src", "/dst").timestamp(5).build().into(),
        ]);
        let paths: Vec<&str> = image.nodes().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["/dst", "/dst/sub", "/dst/sub/y", "/dst/x", "/srcfile"]);
    }

    #[test]
    fn unlink_removes_subtree_only() {
        let image = replay(vec![
            dir("/d"),
            file("/d/f"),
            file("/d2"),
            UnlinkEvent::builder("/d").timestamp(2).build().into(),
        ]);
        assert_eq!(image.len(), 1);
        assert!(image.get("/d2").is_some());
    }

    #[test]
    fn acl_null_clears_and_empty_sets_empty() {
        let entry = AclEntry::new(AclEntryScope::Access, AclEntryType::User, Some("bob".into()), FsAction::Read);
        let with_acl = MetadataUpdateEvent::builder("/a", MetadataType::Acls)
            .acls(Some(vec![entry.clone()]))
            .build();

        let image = replay(vec![file("/a"), with_acl.clone().into()]);
        assert_eq!(image.get("/a").unwrap().acls, vec![entry]);

        let image = replay(vec![
            file("/a"),
            with_acl.into(),
            MetadataUpdateEvent::builder("/a", MetadataType::Acls).acls(None).build().into(),
        ]);
        assert!(image.get("/a").unwrap().acls.is_empty());
    }

    #[test]
    fn metadata_applies_only_its_aspect() {
        let image = replay(vec![
            file("/a"),
            MetadataUpdateEvent::builder("/a", MetadataType::Replication)
                .replication(5)
                .build()
                .into(),
            // Owner update carrying a stray replication value.
            MetadataUpdateEvent::builder("/a", MetadataType::Owner)
                .owner_name("root")
                .replication(1)
                .build()
                .into(),
            MetadataUpdateEvent::builder("/a", MetadataType::Times)
                .mtime(-1)
                .atime(77)
                .build()
                .into(),
        ]);
        let node = image.get("/a").unwrap();
        assert_eq!(node.replication, 5);
        assert_eq!(node.owner, "root");
        assert_eq!(node.group, "g");
        assert_eq!(node.mtime, 1);
        assert_eq!(node.atime, 77);
    }

    #[test]
    fn xattrs_added_then_removed() {
        let tag = XAttr::new(XAttrNamespace::User, "tag", Some(b"v".to_vec()));
        let image = replay(vec![
            file("/a"),
            MetadataUpdateEvent::builder("/a", MetadataType::Xattrs)
                .x_attrs(Some(vec![tag.clone()]))
                .build()
                .into(),
        ]);
        assert_eq!(image.get("/a").unwrap().xattrs.get("user.tag"), Some(&Some(b"v".to_vec())));

        let image = replay(vec![
            file("/a"),
            MetadataUpdateEvent::builder("/a", MetadataType::Xattrs)
                .x_attrs(Some(vec![tag.clone()]))
                .build()
                .into(),
            MetadataUpdateEvent::builder("/a", MetadataType::Xattrs)
                .x_attrs(Some(vec![XAttr::new(XAttrNamespace::User, "tag", None)]))
                .x_attrs_removed(true)
                .build()
                .into(),
        ]);
        assert!(image.get("/a").unwrap().xattrs.is_empty());
    }

    #[test]
    fn events_for_unknown_paths_are_counted() {
        let image = replay(vec![
            CloseEvent::new("/ghost", 1, 1).into(),
            AppendEvent::builder("/ghost").build().into(),
            UnlinkEvent::builder("/ghost").build().into(),
            RenameEvent::builder("/ghost", "/x").build().into(),
        ]);
        assert!(image.is_empty());
        assert_eq!(image.misses(), 4);
    }

    #[test]
    fn render_lists_nodes() {
        let image = replay(vec![
            file("/a"),
            CreateEvent::builder(INodeType::Symlink, "/l")
                .perms(FsPermission::new(0o777))
                .symlink_target("/a")
                .build()
                .into(),
        ]);
        let text = image.render();
        assert!(text.contains("rw-r--r-- u:g /a"));
        assert!(text.contains("/l -> /a"));
    }
}
