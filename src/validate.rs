//! Producer-side lint over event field applicability.

use serde::Serialize;
use thiserror::Error;

use crate::model::{
    CloseEvent, CreateEvent, Event, INodeType, MetadataType, MetadataUpdateEvent, RenameEvent,
    TruncateEvent, UNKNOWN_FILE_SIZE,
};

/// A field combination a well-behaved producer never emits.
///
/// Events are not rejected at construction; this lint is run by consumers
/// that want to audit a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    #[error("path is not absolute: {path:?}")]
    RelativePath { path: String },

    #[error("{inode_type} created with replication {replication}")]
    ReplicationOnNonFile { inode_type: INodeType, replication: i32 },

    #[error("{inode_type} created with symlink target {target:?}")]
    UnexpectedSymlinkTarget { inode_type: INodeType, target: String },

    #[error("symlink created without a target")]
    MissingSymlinkTarget,

    #[error("negative default block size {size}")]
    NegativeBlockSize { size: i64 },

    #[error("close reports invalid size {size}")]
    InvalidCloseSize { size: i64 },

    #[error("truncate reports negative size {size}")]
    NegativeTruncateSize { size: i64 },

    #[error("rename has an empty {side} path")]
    EmptyRenamePath { side: &'static str },

    #[error("{metadata_type} update sets unrelated field `{field}`")]
    UnrelatedMetadataField {
        metadata_type: MetadataType,
        field: &'static str,
    },
}

/// Check an event against the per-kind field applicability rules.
pub fn check_event(event: &Event) -> Vec<Violation> {
    let mut violations = Vec::new();
    match event {
        Event::Create(e) => check_create(e, &mut violations),
        Event::Close(e) => check_close(e, &mut violations),
        Event::Append(e) => check_path(e.path(), &mut violations),
        Event::Rename(e) => check_rename(e, &mut violations),
        Event::MetadataUpdate(e) => check_metadata(e, &mut violations),
        Event::Unlink(e) => check_path(e.path(), &mut violations),
        Event::Truncate(e) => check_truncate(e, &mut violations),
    }
    violations
}

fn check_path(path: &str, out: &mut Vec<Violation>) {
    if !path.starts_with('/') {
        out.push(Violation::RelativePath {
            path: path.to_string(),
        });
    }
}

fn check_create(e: &CreateEvent, out: &mut Vec<Violation>) {
    check_path(e.path(), out);
    if e.inode_type() != INodeType::File && e.replication() != 0 {
        out.push(Violation::ReplicationOnNonFile {
            inode_type: e.inode_type(),
            replication: e.replication(),
        });
    }
    match (e.inode_type(), e.symlink_target()) {
        (INodeType::Symlink, None) => out.push(Violation::MissingSymlinkTarget),
        (INodeType::File | INodeType::Directory, Some(target)) => {
            out.push(Violation::UnexpectedSymlinkTarget {
                inode_type: e.inode_type(),
                target: target.to_string(),
            })
        }
        _ => {}
    }
    if e.default_block_size() < 0 {
        out.push(Violation::NegativeBlockSize {
            size: e.default_block_size(),
        });
    }
}

fn check_close(e: &CloseEvent, out: &mut Vec<Violation>) {
    check_path(e.path(), out);
    if e.file_size() < UNKNOWN_FILE_SIZE {
        out.push(Violation::InvalidCloseSize {
            size: e.file_size(),
        });
    }
}

fn check_truncate(e: &TruncateEvent, out: &mut Vec<Violation>) {
    check_path(e.path(), out);
    if e.file_size() < 0 {
        out.push(Violation::NegativeTruncateSize {
            size: e.file_size(),
        });
    }
}

fn check_rename(e: &RenameEvent, out: &mut Vec<Violation>) {
    for (side, path) in [("source", e.src_path()), ("destination", e.dst_path())] {
        if path.is_empty() {
            out.push(Violation::EmptyRenamePath { side });
        } else {
            check_path(path, out);
        }
    }
}

fn check_metadata(e: &MetadataUpdateEvent, out: &mut Vec<Violation>) {
    check_path(e.path(), out);
    let kind = e.metadata_type();
    let populated = [
        ("mtime", e.mtime() != 0, MetadataType::Times),
        ("atime", e.atime() != 0, MetadataType::Times),
        ("replication", e.replication() != 0, MetadataType::Replication),
        ("owner_name", !e.owner_name().is_empty(), MetadataType::Owner),
        ("group_name", !e.group_name().is_empty(), MetadataType::Owner),
        ("perms", e.perms().is_some(), MetadataType::Perms),
        ("acls", e.acls().is_some(), MetadataType::Acls),
        ("x_attrs", e.x_attrs().is_some(), MetadataType::Xattrs),
        ("x_attrs_removed", e.x_attrs_removed(), MetadataType::Xattrs),
    ];
    for (field, is_set, owner) in populated {
        if is_set && owner != kind {
            out.push(Violation::UnrelatedMetadataField {
                metadata_type: kind,
                field,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppendEvent, UnlinkEvent};
    use crate::perms::FsPermission;
    use pretty_assertions::assert_eq;

    #[test]
    fn well_formed_events_pass() {
        let events: Vec<Event> = vec![
            CreateEvent::builder(INodeType::File, "/f").replication(3).build().into(),
            CreateEvent::builder(INodeType::Directory, "/d").build().into(),
            CreateEvent::builder(INodeType::Symlink, "/l").symlink_target("/f").build().into(),
            CloseEvent::new("/f", UNKNOWN_FILE_SIZE, 1).into(),
            AppendEvent::builder("/f").build().into(),
            RenameEvent::builder("/f", "/g").build().into(),
            MetadataUpdateEvent::builder("/g", MetadataType::Perms)
                .perms(FsPermission::new(0o600))
                .build()
                .into(),
            UnlinkEvent::builder("/g").build().into(),
            TruncateEvent::new("/h", 0, 2).into(),
        ];
        for event in &events {
            assert_eq!(check_event(event), vec![], "{event}");
        }
    }

    #[test]
    fn directory_with_replication() {
        let event: Event = CreateEvent::builder(INodeType::Directory, "/d").replication(3).build().into();
        assert_eq!(
            check_event(&event),
            vec![Violation::ReplicationOnNonFile {
                inode_type: INodeType::Directory,
                replication: 3
            }]
        );
    }

    #[test]
    fn symlink_target_must_match_type() {
        let file: Event = CreateEvent::builder(INodeType::File, "/f").symlink_target("/x").build().into();
        assert!(matches!(
            check_event(&file).as_slice(),
            [Violation::UnexpectedSymlinkTarget { .. }]
        ));

        let link: Event = CreateEvent::builder(INodeType::Symlink, "/l").build().into();
        assert_eq!(check_event(&link), vec![Violation::MissingSymlinkTarget]);
    }

    #[test]
    fn sizes_below_their_floor() {
        let close: Event = CloseEvent::new("/f", -2, 1).into();
        assert_eq!(check_event(&close), vec![Violation::InvalidCloseSize { size: -2 }]);

        let truncate: Event = TruncateEvent::new("/f", -1, 1).into();
        assert_eq!(
            check_event(&truncate),
            vec![Violation::NegativeTruncateSize { size: -1 }]
        );
    }

    #[test]
    fn rename_needs_both_paths() {
        let event: Event = RenameEvent::builder("", "dst").build().into();
        assert_eq!(
            check_event(&event),
            vec![
                Violation::EmptyRenamePath { side: "source" },
                Violation::RelativePath { path: "dst".into() },
            ]
        );
    }

    #[test]
    fn xattrs_removed_outside_xattrs_update() {
        let event: Event = MetadataUpdateEvent::builder("/f", MetadataType::Times)
            .mtime(10)
            .x_attrs_removed(true)
            .build()
            .into();
        assert_eq!(
            check_event(&event),
            vec![Violation::UnrelatedMetadataField {
                metadata_type: MetadataType::Times,
                field: "x_attrs_removed"
            }]
        );
    }

    #[test]
    fn acl_removal_is_not_flagged() {
        let event: Event = MetadataUpdateEvent::builder("/f", MetadataType::Acls).acls(None).build().into();
        assert!(check_event(&event).is_empty());
    }

    #[test]
    fn violation_json_is_tagged() {
        let v = Violation::NegativeBlockSize { size: -5 };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["violation"], "negative_block_size");
        assert_eq!(json["size"], -5);
        assert_eq!(v.to_string(), "negative default block size -5");
    }
}
