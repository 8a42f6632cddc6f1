use chrono::{Duration, TimeZone, Utc};
use taskdeck_core::{Clock, ManualClock, MemoryStorage, Task, TaskFilter, TaskService};

fn clock() -> ManualClock {
    ManualClock::new(Utc.timestamp_millis_opt(1_710_000_000_000).unwrap())
}

fn texts(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|task| task.text.clone()).collect()
}

#[test]
fn add_appends_one_open_task() {
    let clock = clock();
    let mut service = TaskService::with_clock(MemoryStorage::new(), &clock);

    for (index, text) in ["Buy milk", " x ", "Walk dog"].iter().enumerate() {
        let before = service.total_count();
        clock.advance(Duration::milliseconds(5));
        let tasks = service.add_task(text);
        assert_eq!(tasks.len(), before + 1);
        let added = tasks.last().unwrap();
        assert!(!added.completed);
        assert_eq!(added.text, *text);
        assert_eq!(added.created_at, clock.now());
        assert_eq!(service.total_count(), index + 1);
    }
}

#[test]
fn blank_text_is_ignored() {
    let mut service = TaskService::with_clock(MemoryStorage::new(), clock());
    service.add_task("keep");
    let before = service.tasks().to_vec();

    service.add_task("");
    service.add_task("   ");
    service.add_task("\t\n");

    assert_eq!(service.tasks(), before.as_slice());
}

#[test]
fn toggle_twice_restores_task() {
    let mut service = TaskService::with_clock(MemoryStorage::new(), clock());
    service.add_task("first");
    service.add_task("second");
    let original = service.tasks().to_vec();
    let id = original[1].id;

    service.toggle_task(id);
    assert!(service.find_task(id).unwrap().completed);
    assert_eq!(service.tasks()[0], original[0]);

    service.toggle_task(id);
    assert_eq!(service.tasks(), original.as_slice());
}

#[test]
fn unknown_ids_leave_collection_untouched() {
    let mut service = TaskService::with_clock(MemoryStorage::new(), clock());
    service.add_task("a");
    service.add_task("b");
    let before = service.tasks().to_vec();

    service.toggle_task(-1);
    service.delete_task(123);

    assert_eq!(service.tasks(), before.as_slice());
}

#[test]
fn delete_removes_only_matching_task_and_keeps_order() {
    let clock = clock();
    let mut service = TaskService::with_clock(MemoryStorage::new(), &clock);
    for text in ["a", "b", "c"] {
        clock.advance(Duration::milliseconds(1));
        service.add_task(text);
    }
    let middle = service.tasks()[1].id;

    let remaining = service.delete_task(middle);
    let remaining: Vec<_> = remaining.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(remaining, vec!["a", "c"]);
    assert!(service.find_task(middle).is_none());
}

#[test]
fn active_and_completed_partition_all() {
    let mut service = TaskService::with_clock(MemoryStorage::new(), clock());
    for text in ["a", "b", "c", "d", "e"] {
        service.add_task(text);
    }
    let ids: Vec<_> = service.tasks().iter().map(|task| task.id).collect();
    service.toggle_task(ids[0]);
    service.toggle_task(ids[3]);

    let all = service.filtered_view(TaskFilter::All);
    let active = service.filtered_view(TaskFilter::Active);
    let completed = service.filtered_view(TaskFilter::Completed);

    assert_eq!(active.len() + completed.len(), all.len());
    assert!(active.iter().all(|task| !completed.iter().any(|done| done.id == task.id)));
    assert!(all
        .iter()
        .all(|task| active.iter().chain(completed.iter()).any(|other| other.id == task.id)));
    assert_eq!(texts(&completed), vec!["a", "d"]);
    assert_eq!(texts(&active), vec!["b", "c", "e"]);

    let counts = service.counts();
    assert_eq!(counts.total, 5);
    assert_eq!(counts.active, 3);
    assert_eq!(counts.completed, 2);
    assert_eq!(service.completed_count(), service.total_count() - service.active_count());
}

#[test]
fn end_to_end_buy_milk_walk_dog() {
    let clock = clock();
    let mut service = TaskService::with_clock(MemoryStorage::new(), &clock);
    assert!(service.tasks().is_empty());

    service.add_task("Buy milk");
    clock.advance(Duration::milliseconds(250));
    service.add_task("Walk dog");
    let milk = service.tasks()[0].id;
    service.toggle_task(milk);

    let completed = service.filtered_view(TaskFilter::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].text, "Buy milk");
    assert!(completed[0].completed);

    let active = service.filtered_view(TaskFilter::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].text, "Walk dog");
    assert!(!active[0].completed);
}
