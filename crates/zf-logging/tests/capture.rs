// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Runs in its own binary so the captured subscriber is the global one.

use zf_logging::{Level, captured_text, init_for_test};

#[test]
fn captured_logs_contain_emitted_events() {
    let logs = init_for_test("capture", Level::DEBUG);
    tracing::info!(query = "902", "lookup fell back to static list");
    let text = captured_text(&logs);
    assert!(text.contains("lookup fell back to static list"), "got: {text}");
    assert!(text.contains("query=\"902\""), "got: {text}");
}
