//! Whole-session terminal transcripts, pinned as inline snapshots.

mod common;

use common::*;

#[test]
fn snapshot_evaluated_line() {
    let handler = ScriptedHandler::new("$").respond(Response::Value("4".to_string()));
    let session = run_script(handler, b"2+2\r\x04");
    insta::assert_snapshot!(session.transcript(), @"$<CR>$2<CR>$2+<CR>$2+2<LF>4<LF>$<LF>");
}

#[test]
fn snapshot_continuation_line() {
    let handler = ScriptedHandler::new("$")
        .respond(Response::NeedMore)
        .respond(Response::Value("done".to_string()));
    let session = run_script(handler, b"(a\r)\r\x04");
    insta::assert_snapshot!(session.transcript(), @"$<CR>$(<CR>$(a<LF><CR>)<BEL><LF>done<LF>$<LF>");
}

#[test]
fn snapshot_interrupt() {
    let session = run_script(ScriptedHandler::new("$"), &[b'a', b'b', b'c', CTRL_C, CTRL_D]);
    insta::assert_snapshot!(session.transcript(), @"$<CR>$a<CR>$ab<CR>$abc*** Interrupt ***<LF>$<LF>");
}

#[test]
fn snapshot_bracket_match() {
    let session = run_script(ScriptedHandler::new("$"), b"(a)");
    insta::assert_snapshot!(session.transcript(), @"$<CR>$(<CR>$(a<CR>$(a)<CR>$(a)<L><L><L><CR>$(a)");
}
