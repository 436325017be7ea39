use std::{cell::RefCell, convert::Infallible, rc::Rc};

use rxlite::{prelude::*, transport};

type Log = Rc<RefCell<Vec<String>>>;

fn record<S>(source: S, log: &Log) -> S::Unsub
where
  S: Observable,
  S::Item: std::fmt::Debug,
  S::Err: std::fmt::Debug,
{
  let (c1, c2) = (log.clone(), log.clone());
  source.sink(
    move |v| c1.borrow_mut().push(format!("{v:?}")),
    move |c| c2.borrow_mut().push(format!("{c:?}")),
  )
}

#[test]
fn ticking_counter_window() {
  TestScheduler::init();
  let log: Log = Rc::default();
  let subscription = record(
    observable::interval(Duration::from_secs(1), TestScheduler)
      .trace("stream")
      .scan(0, |count, _| count + 1)
      .filter(|count| *count > 5 && *count < 16),
    &log,
  );

  TestScheduler::advance_by(Duration::from_secs(20));
  subscription.unsubscribe();
  TestScheduler::advance_by(Duration::from_secs(20));

  let expected: Vec<String> = (6..16).map(|v| v.to_string()).collect();
  assert_eq!(*log.borrow(), expected);
  assert!(TestScheduler::is_empty());
}

#[test]
fn food_bank_zipped_with_timer() {
  TestScheduler::init();
  let log: Log = Rc::default();
  record(
    observable::from_iter(["Apple", "Orange", "Banana", "Lemon"])
      .zip(observable::interval(Duration::from_secs(1), TestScheduler)),
    &log,
  );

  TestScheduler::advance_by(Duration::from_millis(2500));
  assert_eq!(*log.borrow(), vec![r#"("Apple", 0)"#, r#"("Orange", 1)"#]);

  TestScheduler::advance_by(Duration::from_secs(10));
  assert_eq!(
    *log.borrow(),
    vec![r#"("Apple", 0)"#, r#"("Orange", 1)"#, r#"("Banana", 2)"#, r#"("Lemon", 3)"#, "Finished"]
  );
  assert!(TestScheduler::is_empty());
}

#[test]
fn bag_cancels_everything_it_holds() {
  TestScheduler::init();
  let text = Subject::<String, Infallible>::new();
  let log: Log = Rc::default();
  let mut bag = SubscriptionBag::new();

  let c_log = log.clone();
  bag.add(
    text
      .clone()
      .map(|s| s.to_uppercase())
      .subscribe(move |s| c_log.borrow_mut().push(s)),
  );
  let c_log = log.clone();
  bag.add(
    observable::interval(Duration::from_millis(100), TestScheduler)
      .subscribe(move |tick| c_log.borrow_mut().push(format!("tick {tick}"))),
  );

  text.next("hello".to_string());
  TestScheduler::advance_by(Duration::from_millis(150));
  bag.unsubscribe_all();

  text.next("ignored".to_string());
  TestScheduler::advance_by(Duration::from_millis(500));

  assert_eq!(*log.borrow(), vec!["HELLO", "tick 0"]);
  assert_eq!(text.subscriber_count(), 0);
  assert!(TestScheduler::is_empty());
}

#[test]
fn current_value_drives_a_label() {
  let slider = CurrentValueSubject::<f32, Infallible>::new(0.5);
  let label = Rc::new(RefCell::new(String::new()));

  let c_label = label.clone();
  let subscription = slider
    .clone()
    .map(|v| format!("{:.0}%", v * 100.0))
    .subscribe(move |text| *c_label.borrow_mut() = text);
  assert_eq!(*label.borrow(), "50%");

  slider.next(0.25);
  assert_eq!(*label.borrow(), "25%");
  assert_eq!(slider.value(), 0.25);

  subscription.unsubscribe();
  slider.next(1.0);
  assert_eq!(*label.borrow(), "25%");
}

struct Directory;

impl Transport for Directory {
  type Request = &'static str;
  type Response = Vec<&'static str>;

  fn fetch(&self, path: &'static str, promise: Promise<Self::Response, RxError>) {
    match path {
      "/companies" => promise.succeed(vec!["Apple", "Facebook", "Google", "Spotify"]),
      other => promise.fail(RxError::NotFound(other.to_string())),
    }
  }
}

#[test]
fn transport_pipeline_with_fallback() {
  let log: Log = Rc::default();
  let events: Log = Rc::default();
  let (c1, c2) = (events.clone(), events.clone());

  record(
    transport::request(&Directory, "/companies")
      .handle_events(
        EventHooks::new()
          .on_subscribe(move || c1.borrow_mut().push("subscribed".into()))
          .on_completion(move |c| c2.borrow_mut().push(format!("{c:?}"))),
      )
      .map(|companies| companies.len())
      .replace_error(0),
    &log,
  );
  record(transport::request(&Directory, "/missing").replace_error(vec![]), &log);

  assert_eq!(*log.borrow(), vec!["4", "Finished", "[]", "Finished"]);
  assert_eq!(*events.borrow(), vec!["subscribed", "Finished"]);
}

#[test]
fn boxed_pipelines_hide_stage_types() {
  fn doubled_evens(source: Subject<i32, Infallible>) -> BoxedObservable<i32, Infallible> {
    source.filter(|v| v % 2 == 0).map(|v| v * 2).box_it()
  }

  let source = Subject::new();
  let log: Log = Rc::default();
  let subscription = record(doubled_evens(source.clone()), &log);

  (1..=4).for_each(|v| source.next(v));
  subscription.unsubscribe();
  source.next(6);

  assert_eq!(*log.borrow(), vec!["4", "8"]);
}
