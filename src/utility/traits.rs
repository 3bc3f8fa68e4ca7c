
use serenity::builder::CreateMessage;


pub trait Singleton: Sized + 'static {
    fn get_instance() -> &'static Self;
    fn new() -> Self;
}

#[macro_export]
macro_rules! impl_singleton {
    ($t:ty) => {
        impl $crate::utility::traits::Singleton for $t {
            fn get_instance() -> &'static Self {
                static INSTANCE: once_cell::sync::Lazy<$t> = once_cell::sync::Lazy::new(|| <$t>::new());
                &INSTANCE
            }

            fn new() -> Self {
                <$t>::new()
            }
        }
    };
}


pub trait ToMessage {
    fn to_message(&self) -> CreateMessage;
}

impl ToMessage for &str {
    fn to_message(&self) -> CreateMessage {
        CreateMessage::new().content(self.to_string())
    }
}

impl ToMessage for String {
    fn to_message(&self) -> CreateMessage {
        CreateMessage::new().content(self.clone())
    }
}
