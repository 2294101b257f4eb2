//! Wire-level dispatch: frames in, `$OK`/`$ERR` out, tasks on the executor.

use ledstrip::config::{CommandSpec, ControllerConfig};
use ledstrip::patterns::PatternKind;
use ledstrip::protocol::codec::Reply;
use ledstrip::strip::ColorOrder;

use crate::mock_hw::Rig;

#[test]
fn every_frame_gets_exactly_one_reply() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$stop,left\r\n"), Some(Reply::Ok));
    assert_eq!(rig.send(b"$nosuch\n"), Some(Reply::Err));
    assert_eq!(rig.send(b"junk without marker\n"), None);
    assert_eq!(rig.send(b"$\n"), Some(Reply::Err));
    assert_eq!(rig.output(), "$OK\r\n$ERR\r\n$ERR\r\n");
}

#[test]
fn frame_split_across_reads() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"xx$sto"), None);
    assert_eq!(rig.send(b"p,ri"), None);
    assert_eq!(rig.send(b"ght\r"), Some(Reply::Ok));
    assert_eq!(rig.send(b"\n"), None);
    assert_eq!(rig.output(), "$OK\r\n");
}

#[test]
fn restart_marker_resyncs() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$bogus,1$stop,left\n"), Some(Reply::Ok));
}

#[test]
fn meter_end_to_end() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$config,meter,0,9,0,255,0,0,0,0\n"), Some(Reply::Ok));
    rig.tick(4);
    assert_eq!(rig.send(b"$meter,50\n"), Some(Reply::Ok));
    rig.tick(4);

    let order = ColorOrder::Grb;
    let frame = rig.last_frame(0);
    let red: Vec<u8> = frame[..10].iter().map(|&p| order.unpack(p).0).collect();
    assert_eq!(red, [0, 25, 51, 76, 102, 0, 0, 0, 0, 0]);
    assert!(frame[1..5].iter().all(|&p| p != 0));
    assert_eq!(rig.frames(0), 1);
    assert_eq!(rig.live(), 0);
}

#[test]
fn unknown_command_leaves_running_task() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$left\n"), Some(Reply::Ok));
    assert_eq!(rig.tick(5), 5);
    assert_eq!(rig.owner_name(0).as_deref(), Some("left"));

    assert_eq!(rig.send(b"$LEFT\n"), Some(Reply::Err));
    let before = rig.frames(0);
    rig.tick(5);
    assert!(rig.frames(0) > before, "left kept drawing");
    assert_eq!(rig.owner_name(0).as_deref(), Some("left"));
    assert_eq!(rig.live(), 1);

    assert_eq!(rig.send(b"$stop,left\n"), Some(Reply::Ok));
    rig.tick(5);
    assert_eq!(rig.live(), 0);
    assert_eq!(rig.owner_name(0), None);
    assert!(rig.last_frame(0).iter().all(|&p| p == 0), "cleared on exit");
}

#[test]
fn config_for_unknown_name_is_ok() {
    let mut rig = Rig::with_defaults();
    assert_eq!(rig.send(b"$config,ghost,1,2,3\n"), Some(Reply::Ok));
    assert_eq!(rig.send(b"$config,meter\n"), Some(Reply::Ok));
    assert_eq!(rig.tick(10), 2);
    assert_eq!(rig.live(), 0);
    assert_eq!(rig.output(), "$OK\r\n$OK\r\n");
}

#[test]
fn stop_is_idempotent_over_the_wire() {
    let mut rig = Rig::with_defaults();
    for _ in 0..3 {
        assert_eq!(rig.send(b"$stop,random\n"), Some(Reply::Ok));
        rig.tick(2);
    }
    assert_eq!(rig.send(b"$stop,nobody\n"), Some(Reply::Ok));
    rig.tick(2);

    // A stale stop does not cancel the next run.
    assert_eq!(rig.send(b"$random\n"), Some(Reply::Ok));
    rig.tick(6);
    assert_eq!(rig.live(), 1);
    assert!(rig.frames(0) >= 2);

    rig.send(b"$stop,random\n");
    rig.tick(4);
    assert_eq!(rig.live(), 0);
}

#[test]
fn stop_while_waiting_for_strip_cancels_the_run() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$left\n");
    rig.tick(3);
    assert_eq!(rig.owner_name(0).as_deref(), Some("left"));

    // random queues behind left and is stopped before it gets the strip.
    rig.send(b"$random\n");
    rig.send(b"$stop,random\n");
    rig.tick(20);

    assert_eq!(rig.live(), 0);
    assert_eq!(rig.owner_name(0), None);
    assert!(rig.last_frame(0).iter().all(|&p| p == 0));

    // The cancelled stop is not carried into the next run.
    rig.send(b"$random\n");
    rig.tick(4);
    assert_eq!(rig.live(), 1);
    assert_eq!(rig.owner_name(0).as_deref(), Some("random"));
    rig.send(b"$stop,random\n");
    rig.tick(4);
    assert_eq!(rig.live(), 0);
}

#[test]
fn redispatching_a_running_pattern_keeps_one_instance() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$left\n");
    rig.tick(3);
    rig.send(b"$left\n");
    rig.tick(10);

    assert_eq!(rig.live(), 1);
    assert_eq!(rig.owner_name(0).as_deref(), Some("left"));
    let before = rig.frames(0);
    rig.tick(3);
    assert!(rig.frames(0) > before, "second run is drawing");

    rig.send(b"$stop,left\n");
    rig.tick(5);
    assert_eq!(rig.live(), 0);
}

#[test]
fn extreme_positions_do_not_panic() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$config,meter,0,-2147483648,255,255,0,0,0,0\n");
    rig.send(b"$meter,100\n");
    rig.tick(4);
    assert_eq!(rig.live(), 0);
    assert_eq!(rig.frames(0), 1);

    rig.send(b"$config,left,2147483646,2147483647,1,0,0,0\n");
    rig.send(b"$left\n");
    assert_eq!(rig.tick(10), 10);
    assert_eq!(rig.live(), 1);
    rig.send(b"$stop,left\n");
    rig.tick(5);
    assert_eq!(rig.live(), 0);
    assert!(rig.last_frame(0).iter().all(|&p| p == 0));
}

#[test]
fn huge_meter_run_finishes_in_one_pass() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$config,meter,0,2000000000,7,7,0,0,0,0\n");
    rig.send(b"$meter,100\n");
    assert!(rig.tick(4) <= 2);
    assert_eq!(rig.live(), 0);

    let on = ColorOrder::Grb.pack(7, 0, 0);
    let frame = rig.last_frame(0);
    assert_eq!(frame.len(), 144);
    assert!(frame.iter().all(|&p| p == on));
}

#[test]
fn patterns_on_different_strips_run_together() {
    let mut rig = Rig::with_defaults();
    rig.send(b"$left\n");
    rig.send(b"$right\n");
    rig.tick(6);
    assert_eq!(rig.live(), 2);
    assert_eq!(rig.owner_name(0).as_deref(), Some("left"));
    assert_eq!(rig.owner_name(1).as_deref(), Some("right"));

    rig.send(b"$stop,left\n");
    rig.send(b"$stop,right\n");
    rig.tick(6);
    assert_eq!(rig.live(), 0);
}

#[test]
fn added_command_is_dispatchable() {
    let mut cfg = ControllerConfig::default();
    cfg.commands = vec![CommandSpec::new("fill", PatternKind::Range, 1)];
    let mut rig = Rig::new(&cfg);
    assert_eq!(rig.send(b"$bar,50\n"), Some(Reply::Err));
    assert_eq!(rig.send(b"$add,bar,LedMeter,1\n"), Some(Reply::Ok));
    rig.tick(2);
    assert_eq!(rig.send(b"$config,bar,0,3,0,0,0,0,40,40\n"), Some(Reply::Ok));
    rig.tick(2);
    assert_eq!(rig.send(b"$bar,100\n"), Some(Reply::Ok));
    rig.tick(4);

    let frame = rig.last_frame(1);
    assert_eq!(frame[..5], [40, 40, 40, 40, 0]);
    assert_eq!(rig.frames(0), 0);
}
