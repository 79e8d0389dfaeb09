// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

use crate::document::ElementId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("element {0} is not in the document")]
    UnknownElement(ElementId),

    #[error("element {0} already has an autocomplete binding")]
    AlreadyBound(ElementId),

    #[error("element {0} is not a text input")]
    NotTextInput(ElementId),
}
