mod support;

use support::{FakeVoice, Fixture, entries, render_text};

#[test]
fn hello_world_renders_default_speaker() {
    let fx = Fixture::new("render_hello");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "Hello world").as_deref(),
        Some("<udisen:Hello world>")
    );
}

#[test]
fn speaker_switch_reaches_the_voice() {
    let fx = Fixture::new("render_switch");
    let voice = FakeVoice::new(&["udisen", "alice"]);
    let spoken = voice.spoken.clone();
    let synth = fx.synthesizer(voice);
    assert_eq!(
        render_text(&synth, "alice: Hi there").as_deref(),
        Some("<alice:Hi there>")
    );
    assert_eq!(
        *spoken.lock().unwrap(),
        vec![("alice".to_owned(), "Hi there".to_owned())]
    );
}

#[test]
fn groups_concatenate_in_order() {
    let fx = Fixture::new("render_concat");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen", "bob"]));
    assert_eq!(
        render_text(&synth, "one bob: two udisen: three").as_deref(),
        Some("<udisen:one><bob:two><udisen:three>")
    );
}

#[test]
fn preset_filter_applies_to_rendered_child() {
    let fx = Fixture::new("render_preset");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "{1}echo test{.}").as_deref(),
        Some("room echo(<udisen:echo test>)")
    );
}

#[test]
fn nested_filters_apply_inside_out() {
    let fx = Fixture::new("render_nested");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "a {8}b {11}c{.}{.}").as_deref(),
        Some("<udisen:a>quieter(<udisen:b>slow down(<udisen:c>))")
    );
}

#[test]
fn missing_effect_is_skipped() {
    let fx = Fixture::new("render_missing_effect");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(render_text(&synth, "[5] boo").as_deref(), Some("<udisen:boo>"));
}

#[test]
fn effects_resolve_by_format_priority() {
    let fx = Fixture::new("render_effects");
    fx.add_effect("5.wav", b"W5");
    fx.add_effect("6.mp3", b"M6");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "[5] boo [6]").as_deref(),
        Some("W5<udisen:boo>wav(M6)")
    );
}

#[test]
fn empty_filter_produces_nothing() {
    let fx = Fixture::new("render_empty_filter");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(render_text(&synth, "{2}{.}"), None);
}

#[test]
fn unterminated_marker_produces_nothing() {
    let fx = Fixture::new("render_unterminated");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(render_text(&synth, "{7 without close"), None);
}

#[test]
fn failed_speech_is_dropped_locally() {
    let fx = Fixture::new("render_failed_speech");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "ghost: boo udisen: ok").as_deref(),
        Some("<udisen:ok>")
    );
    assert_eq!(render_text(&synth, "ghost: boo"), None);
}

#[test]
fn failed_filter_body_fails_only_the_filter() {
    let fx = Fixture::new("render_failed_filter");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "{1}ghost: boo{.} udisen: after").as_deref(),
        Some("<udisen:after>")
    );
}

#[test]
fn unknown_filter_passes_audio_through() {
    let fx = Fixture::new("render_unknown_filter");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    assert_eq!(
        render_text(&synth, "{99}plain{.}").as_deref(),
        Some("<udisen:plain>")
    );
}

#[test]
fn parallel_render_preserves_order() {
    let mut fx = Fixture::new("render_parallel");
    fx.config.parallel = true;
    fx.config.threads = Some(4);
    let synth = fx.synthesizer(FakeVoice::new(&["udisen", "a", "b"]));
    let markup = "a: 1 b: 2 a: 3 {5}b: 4 a: 5{.} b: 6 a: 7 b: 8";
    assert_eq!(
        render_text(&synth, markup).as_deref(),
        Some("<a:1><b:2><a:3>pitch up(<b:4><a:5>)<b:6><a:7><b:8>")
    );
}

#[test]
fn renders_use_separate_scratch_dirs() {
    let fx = Fixture::new("render_scratch");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    let first = synth.render("one").unwrap();
    let second = synth.render("two").unwrap();
    assert_ne!(first.scratch_dir(), second.scratch_dir());
    assert_eq!(std::fs::read(first.artifact().unwrap()).unwrap(), b"<udisen:one>");

    let dir = first.scratch_dir().to_path_buf();
    drop(first);
    assert!(!dir.exists());
    assert!(second.scratch_dir().exists());
}

#[test]
fn render_to_copies_the_final_artifact() {
    let fx = Fixture::new("render_to");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    let out = fx.root.join("out").join("audio.wav");
    assert_eq!(synth.render_to("hi", &out).unwrap(), Some(out.clone()));
    assert_eq!(std::fs::read(&out).unwrap(), b"<udisen:hi>");
    assert_eq!(synth.render_to("{.}", &fx.root.join("none.wav")).unwrap(), None);
    assert!(!fx.root.join("none.wav").exists());
}

#[test]
fn render_to_leaves_no_scratch_behind() {
    let fx = Fixture::new("render_to_cleanup");
    fx.add_effect("1.wav", b"ding");
    let synth = fx.synthesizer(FakeVoice::new(&["udisen"]));
    let out = fx.root.join("audio.wav");
    for _ in 0..5 {
        assert!(synth.render_to("a [1] b", &out).unwrap().is_some());
    }
    assert_eq!(synth.render_to("[404]", &out).unwrap(), None);
    assert_eq!(entries(&fx.config.scratch_dir), 0);
    assert_eq!(std::fs::read(&out).unwrap(), b"<udisen:a>ding<udisen:b>");
}
