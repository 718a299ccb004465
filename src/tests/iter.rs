
use super::counted;
use crate::*;

#[test]
fn forward_walk_with_begin_and_end() -> Result<(), Error> {
    let holder = counted(5);
    let mut seen = Vec::new();

    let mut it = holder.begin();
    let end = holder.end();
    while it.try_ne(&end)? {
        seen.push(*it.get()?);
        it.advance();
    }
    assert_eq!(seen, [0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn reverse_walk_with_rbegin_and_rend() -> Result<(), Error> {
    let holder = counted(5);
    let mut seen = Vec::new();

    let mut it = holder.rbegin();
    let rend = holder.rend();
    while it.try_ne(&rend)? {
        seen.push(*it.get()?);
        it.advance();
    }
    assert_eq!(seen, [4, 3, 2, 1, 0]);
    Ok(())
}

#[test]
fn cursor_is_an_iterator(){
    let holder = counted(4);
    assert_eq!(holder.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3]);
    assert_eq!(holder.rbegin().copied().collect::<Vec<_>>(), [3, 2, 1, 0]);
    assert_eq!(holder.iter().sum::<i32>(), 6);

    let mut total = 0;
    for elem in &holder {
        total += elem;
    }
    assert_eq!(total, 6);
}

#[test]
fn size_hint_tracks_position(){
    let holder = counted(4);
    let mut it = holder.begin();
    assert_eq!(it.len(), 4);
    it.next();
    assert_eq!(it.len(), 3);

    let mut rit = holder.rbegin();
    assert_eq!(rit.len(), 4);
    rit.by_ref().for_each(drop);
    assert_eq!(rit.len(), 0);
    assert!(rit.next().is_none());
}

#[test]
fn end_is_bound_to_size_not_capacity() -> Result<(), Error> {
    let mut holder = Array::with_capacity(16)?;
    for elem in 0..3 {
        holder.push_back(elem)?;
    }
    let mut it = holder.begin();
    it.advance().advance().advance();

    assert!(it.try_eq(&holder.end())?);
    assert_eq!(holder.end().index(), 3);
    assert_eq!(holder.end().get(), Err(Error::OutOfRange{index:3, size:3}));
    assert_eq!(holder.iter().count(), 3);
    Ok(())
}

#[test]
fn empty_array_has_coinciding_bounds() -> Result<(), Error> {
    let holder:Array<i32> = Array::new();
    assert!(holder.begin().try_eq(&holder.end())?);
    assert!(holder.rbegin().try_eq(&holder.rend())?);
    assert!(holder.begin().get().is_err());
    assert!(holder.rbegin().get().is_err());
    assert_eq!(holder.iter().next(), None);
    Ok(())
}

#[test]
fn rend_is_the_wrapped_sentinel(){
    let holder = counted(2);
    let rend = holder.rend();
    assert_eq!(rend.index(), usize::MAX);
    assert_eq!(rend.direction(), Direction::Reverse);
    assert_eq!(rend.get(), Err(Error::OutOfRange{index:usize::MAX, size:2}));
}

#[test]
fn pre_and_post_advance(){
    let holder = counted(3);
    let mut it = holder.begin();

    let before = it.post_advance();
    assert_eq!(before.get(), Ok(&0));
    assert_eq!(it.get(), Ok(&1));

    assert_eq!(it.advance().get(), Ok(&2));

    let mut rit = holder.rbegin();
    let before = rit.post_advance();
    assert_eq!(before.get(), Ok(&2));
    assert_eq!(rit.get(), Ok(&1));
}

#[test]
fn equality_needs_same_position(){
    let holder = counted(3);
    let mut it = holder.begin();
    let start = it;
    assert_eq!(it.try_eq(&start), Ok(true));
    it.advance();
    assert_eq!(it.try_eq(&start), Ok(false));
    assert_eq!(it.try_ne(&start), Ok(true));
}

#[test]
fn equality_needs_same_buffer(){
    let left = counted(3);
    let right = counted(3);
    assert_eq!(left.begin().try_eq(&right.begin()), Ok(false));
}

#[test]
fn equality_tells_apart_unmapped_arrays(){
    let left:Array<i32> = Array::new();
    let right:Array<i32> = Array::new();
    assert_eq!(left.begin().try_eq(&right.begin()), Ok(false));
    assert_eq!(left.end().try_eq(&right.end()), Ok(false));
    assert_eq!(left.rend().try_ne(&right.rend()), Ok(true));

    let mut units = Array::new();
    let mut more_units = Array::new();
    for _ in 0..3 {
        units.push_back(()).unwrap();
        more_units.push_back(()).unwrap();
    }
    assert_eq!(units.as_ptr(), more_units.as_ptr());
    assert_eq!(units.begin().try_eq(&more_units.begin()), Ok(false));
    assert_eq!(units.begin().try_eq(&units.begin()), Ok(true));
}

#[test]
fn mixed_direction_comparison_fails(){
    let holder = counted(3);
    assert_eq!(holder.begin().try_eq(&holder.rbegin()), Err(Error::InvalidComparison));
    assert_eq!(holder.rend().try_ne(&holder.end()), Err(Error::InvalidComparison));
}

#[test]
fn cursor_debug_shows_position(){
    let holder = counted(3);
    let rendered = format!("{:?}", holder.rbegin());
    assert!(rendered.contains("index: 2"));
    assert!(rendered.contains("Reverse"));
}
