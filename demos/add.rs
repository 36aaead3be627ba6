use arity_curry::{curried, curry_with, CurryError};

#[curried]
fn add(x: i32, y: i32, z: i32) -> i32 {
    x + y + z
}

fn main() -> Result<(), CurryError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let add_three_to = add().call([3])?;
    let sum = add_three_to.call([10])?.call([10])?.complete();
    assert_eq!(sum, Some(23));
    println!("add_three_to(10)(10) = {sum:?}");

    let add = |x: i32, y: i32, z: i32| x + y + z;
    if let Some(add_four_to) = curry_with(add, [4])?.partial() {
        println!("add_four_to(4) = {:?}", add_four_to.call([4])?);
        println!("add_four_to(5, 5) = {:?}", add_four_to.call([5, 5])?);
        println!("add_four_to(4)(2) = {:?}", add_four_to.call([4])?.call([2])?);
    }
    Ok(())
}
