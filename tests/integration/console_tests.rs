//! Console output from built-ins, and the serve loop as a task.

use ledstrip::protocol::codec::Reply;

use crate::mock_hw::{tick, Rig};

#[test]
fn help_follows_ok_after_flush() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$help\n"), Some(Reply::Ok));
    rig.tick(4);
    rig.controller.flush();

    let out = rig.output();
    assert!(
        out.starts_with("$OK\r\n\r\nCommands\r\n--------\r\nhelp     : show list of commands\r\n"),
        "{out}"
    );
    assert!(out.contains("freemem  : show free memory\r\n"));
    assert!(out.contains("meter    : meter,<pct 0-100>\r\n"));
    assert!(out.ends_with("\r\n\r\n"));
}

#[test]
fn help_config_lists_config_fields() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$help,config\n");
    rig.tick(4);
    rig.controller.flush();

    let out = rig.output();
    assert!(out.contains("Configs\r\n-------\r\n"));
    assert!(out.contains("random   : dark-threshold(0-255),max-intensity(0-255),num-pixels,delay_ms\r\n"));
    assert!(out.contains("help     : no configs\r\n"));
}

#[test]
fn freemem_answers_on_the_console() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$freemem\n"), Some(Reply::Ok));
    rig.tick(2);
    rig.controller.flush();
    assert_eq!(rig.output(), "$OK\r\nfree mem: unknown\r\n");
}

#[test]
fn strips_names_the_owner() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$right\n");
    rig.tick(4);
    rig.send(b"$strips\n");
    rig.tick(4);
    rig.controller.flush();

    let out = rig.output();
    assert!(out.contains("0: 144 pixels, Grb, lock: false, user: -\r\n"), "{out}");
    assert!(out.contains("1: 144 pixels, Grb, lock: true, user: right\r\n"), "{out}");

    rig.send(b"$stop,right\n");
    rig.tick(4);
    assert_eq!(rig.live(), 0);
}

#[test]
fn serve_task_reads_dispatches_and_flushes() {
    let mut rig = Rig::with_defaults();
    rig.controller.transport_mut().push(b"$help\n");
    rig.controller.transport_mut().push(b"$nope\n");
    rig.controller.transport_mut().push(b"$range1,0,2,1,2,3\n");
    let (executor, output) = rig.serve(1);

    // The serve loop never finishes, so every budget is used up.
    assert_eq!(tick(&executor, 200), 200);

    let out = String::from_utf8_lossy(&output.borrow()).into_owned();
    let replies: Vec<&str> = out.lines().filter(|l| l.starts_with('$')).collect();
    assert_eq!(replies, ["$OK", "$ERR", "$OK"], "{out}");
    let ok = out.find("$OK").expect("help acknowledged");
    let title = out.find("Commands").expect("help printed");
    assert!(ok < title, "{out}");
}
