// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the gateway and the components it drives.

pub mod credentials;

pub use credentials::CredentialVerifier;
