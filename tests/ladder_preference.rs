mod common;

use common::{scripted_locator, AllAvailable, FakeClock, MemoryResources, ScriptedPrimitive, Target};
use onsight::{
    FsResources, Locator, LocatorConfig, SearchOutcome, SearchPhase, Template, TemplateResources,
};
use std::io::Write;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(10);

fn button() -> Template {
    Template::new("assets/1_button.png")
}

#[test]
fn highest_matching_level_wins() {
    let cases = [
        (0.95, Some(0.8)),
        (0.8, Some(0.8)),
        (0.75, Some(0.7)),
        (0.65, Some(0.6)),
        (0.5, Some(0.5)),
        (0.45, Some(0.4)),
        (0.3, None),
    ];
    for (confidence, expected) in cases {
        let clock = FakeClock::new();
        let primitive =
            ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(confidence));
        let locator = scripted_locator(primitive, AllAvailable, &clock);

        let outcome = locator.locate(&button(), TIMEOUT);
        assert_eq!(
            outcome.found().map(|m| m.level),
            expected,
            "confidence {confidence}"
        );
    }
}

#[test]
fn lower_levels_are_not_consulted_after_a_match() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(0.65));
    let locator = scripted_locator(primitive, AllAvailable, &clock);

    let outcome = locator.locate(&button(), TIMEOUT);
    let found = outcome.found().unwrap();
    assert_eq!(found.phase, SearchPhase::Probe);
    assert_eq!(*locator.primitive().probes.borrow(), vec![0.8, 0.7, 0.6]);
    assert!(locator.primitive().waits.borrow().is_empty());
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

#[test]
fn repeated_searches_agree() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(0.72));
    let locator = scripted_locator(primitive, AllAvailable, &clock);

    let first = locator.locate(&button(), TIMEOUT);
    let second = locator.locate(&button(), TIMEOUT);
    assert!(first.is_found());
    assert_eq!(first, second);
}

#[test]
fn missing_resource_issues_no_primitive_calls() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(1.0));
    let locator = scripted_locator(primitive, MemoryResources::default(), &clock);

    for timeout in [Duration::ZERO, TIMEOUT, Duration::from_secs(3600)] {
        assert_eq!(
            locator.locate(&button(), timeout),
            SearchOutcome::ResourceMissing
        );
    }
    assert_eq!(locator.find(&button()), SearchOutcome::ResourceMissing);
    assert!(!locator.exists(&button()));
    assert_eq!(locator.primitive().calls(), 0);
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

#[test]
fn primitive_errors_count_as_misses() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock)
        .with_target(&button(), Target::visible(0.85))
        .failing_at(&[0.8]);
    let locator = scripted_locator(primitive, AllAvailable, &clock);

    let found = locator.locate(&button(), TIMEOUT);
    assert_eq!(found.found().map(|m| m.level), Some(0.7));
}

#[test]
fn set_similarity_moves_the_top_of_the_ladder() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(0.9));
    let mut locator = scripted_locator(primitive, AllAvailable, &clock);

    assert_eq!(locator.set_similarity(0.9), 0.9);
    let found = locator.locate(&button(), TIMEOUT);
    assert_eq!(found.found().map(|m| m.level), Some(0.9));

    assert_eq!(locator.set_similarity(1.5), 0.8);
    assert_eq!(locator.similarity(), 0.8);
    assert_eq!(locator.set_similarity(-0.1), 0.8);
    assert_eq!(locator.similarity(), 0.8);
}

#[test]
fn find_probes_without_waiting() {
    let clock = FakeClock::new();
    let later = Target::visible(0.9).appearing_at(Duration::from_secs(1));
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), later);
    let locator = scripted_locator(primitive, AllAvailable, &clock);

    assert!(!locator.exists(&button()));
    assert_eq!(locator.primitive().probes.borrow().len(), 5);
    assert!(locator.primitive().waits.borrow().is_empty());

    clock.advance(Duration::from_secs(1));
    let found = locator.find(&button());
    assert_eq!(found.found().map(|m| m.level), Some(0.8));
}

#[test]
fn custom_ladder_from_config() {
    let clock = FakeClock::new();
    let primitive = ScriptedPrimitive::new(&clock).with_target(&button(), Target::visible(0.35));
    let config = LocatorConfig {
        default_similarity: 0.7,
        fallback_levels: vec![0.3, 0.6, 0.5, 0.4],
        ..LocatorConfig::default()
    };
    let locator = Locator::new(primitive, &config)
        .unwrap()
        .with_resources(AllAvailable)
        .with_clock(clock.clone());

    let found = locator.locate(&button(), TIMEOUT);
    assert_eq!(found.found().map(|m| m.level), Some(0.3));
    assert_eq!(
        *locator.primitive().probes.borrow(),
        vec![0.7, 0.6, 0.5, 0.4, 0.3]
    );
}

#[test]
fn fs_resources_require_a_readable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("present.png");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"not really a png").unwrap();

    assert!(FsResources.is_available(&Template::new(&path)));
    assert!(!FsResources.is_available(&Template::new(dir.path().join("absent.png"))));
    assert!(!FsResources.is_available(&Template::new(dir.path())));
}
