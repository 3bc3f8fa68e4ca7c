
use std::pin::Pin;
use std::future::Future;


pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub fn string_distance(a: &str, b: &str) -> usize {
    let longer = a.chars().count().max(b.chars().count());
    let equal = a.chars().zip(b.chars()).filter(|(a, b)| a == b).count();
    longer - equal
}
