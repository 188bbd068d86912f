// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project

/// Environment entry carried by every generation change.
pub const NEW_VMGENID_ENV: &str = "NEW_VMGENID=1";

/// kobject uevent actions.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KobjAction {
    Add,
    Remove,
    Change,
    Move,
    Online,
    Offline,
    Bind,
    Unbind,
}

impl KobjAction {
    /// The `ACTION=` string userspace sees.
    pub const fn as_str(&self) -> &'static str {
        match self {
            KobjAction::Add => "add",
            KobjAction::Remove => "remove",
            KobjAction::Change => "change",
            KobjAction::Move => "move",
            KobjAction::Online => "online",
            KobjAction::Offline => "offline",
            KobjAction::Bind => "bind",
            KobjAction::Unbind => "unbind",
        }
    }
}

/// A uevent raised against the device.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChangeEvent {
    pub action: KobjAction,
    pub envp: &'static [&'static str],
}

impl ChangeEvent {
    /// The marker-only event sent when the generation id moves.
    pub const fn new_vmgenid() -> Self {
        Self {
            action: KobjAction::Change,
            envp: &[NEW_VMGENID_ENV],
        }
    }
}
