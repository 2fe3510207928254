use event_search::clock::ManualClock;
use event_search::controller::{DEFAULT_DELAY, FilterController, QueryInput, TextInput};
use event_search::replay::{Firing, Trigger, parse_script, replay};

fn names() -> Vec<String> {
    ["Summer Jazz Festival", "Rock im Park", "Open Air Kino", "Jazz Brunch"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn run_script(script: &str) -> (Vec<Firing>, String) {
    let clock = ManualClock::new();
    let mut controller = FilterController::attach(
        names(),
        TextInput::default(),
        clock.clone(),
        DEFAULT_DELAY,
        |s: &String| s.clone(),
    );
    let steps = parse_script(script).expect("valid script");
    let firings = replay(&mut controller, &clock, &steps);
    let input = controller.input().value();
    (firings, input)
}

#[test]
fn test_burst_fires_once_after_last_keystroke() {
    let (firings, _) = run_script("0 j\n100 ja\n200 jaz\n250 jazz\n");

    assert_eq!(firings.len(), 1, "a burst should fire once: {firings:?}");
    assert_eq!(firings[0].at_ms, 550);
    assert_eq!(firings[0].query, "jazz");
    assert_eq!(firings[0].trigger, Trigger::Debounce);
    assert_eq!(firings[0].outcome.visible, 2);
}

#[test]
fn test_pause_longer_than_delay_fires_in_between() {
    let (firings, _) = run_script("0 jazz\n400 jazz !brunch\n");

    let at: Vec<u64> = firings.iter().map(|f| f.at_ms).collect();
    assert_eq!(at, vec![300, 700]);
    assert_eq!(firings[1].outcome.visible, 1);
}

#[test]
fn test_keystroke_exactly_at_deadline_fires_first() {
    let (firings, _) = run_script("0 rock\n300 rock !park\n");
    assert_eq!(firings.len(), 2);
    assert_eq!(firings[0].query, "rock");
}

#[test]
fn test_clear_and_exclude_fire_immediately() {
    let (firings, input) = run_script("0 jazz\n100 :exclude Brunch\n500 :clear\n");

    let triggers: Vec<Trigger> = firings.iter().map(|f| f.trigger).collect();
    assert_eq!(triggers, vec![Trigger::Exclude, Trigger::Clear]);
    assert_eq!(firings[0].at_ms, 100);
    assert_eq!(firings[0].query, "jazz !brunch");
    assert_eq!(firings[0].outcome.visible, 1);
    assert!(firings[1].outcome.empty_state_visible);
    assert_eq!(firings[1].outcome.visible, 4);
    assert_eq!(input, "");
}

#[test]
fn test_deleting_the_query_shows_everything() {
    let (firings, _) = run_script("0 kino\n500\n");

    assert_eq!(firings.len(), 2);
    assert_eq!(firings[0].outcome.visible, 1);
    assert_eq!(firings[1].outcome.visible, 4);
    assert!(firings[1].outcome.empty_state_visible);
}
