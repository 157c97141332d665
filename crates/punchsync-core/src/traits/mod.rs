// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented outside the core.

pub mod device;

pub use device::DeviceAdapter;
