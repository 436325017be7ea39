use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableType},
  observer::Observer,
};

/// Creates a publisher that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never fails. Emission stops
/// early once the downstream observer reports itself closed, so
/// `from_iter(0..)` is fine as long as something downstream terminates.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<Iter>(Iter);

impl<Iter: IntoIterator> ObservableType for FromIter<Iter> {
  type Item = Iter::Item;
  type Err = Infallible;
}

impl<Iter: IntoIterator> Observable for FromIter<Iter> {
  type Unsub = ();

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Iter::Item, Infallible> + 'static,
  {
    for v in self.0 {
      if observer.is_closed() {
        return;
      }
      observer.next(v);
    }
    observer.complete();
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[test]
  fn from_range() {
    let hit_count = Rc::new(RefCell::new(0));
    let completed = Rc::new(RefCell::new(false));
    let (c_hit, c_completed) = (hit_count.clone(), completed.clone());
    observable::from_iter(0..100).sink(
      move |_| *c_hit.borrow_mut() += 1,
      move |c| *c_completed.borrow_mut() = c == Completion::Finished,
    );

    assert_eq!(*hit_count.borrow(), 100);
    assert!(*completed.borrow());
  }

  #[test]
  fn stops_when_downstream_closes() {
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    observable::from_iter(['a', 'b'])
      .zip(observable::from_iter(0..))
      .subscribe(move |pair| c_seen.borrow_mut().push(pair));

    assert_eq!(*seen.borrow(), vec![('a', 0), ('b', 1)]);
  }
}
