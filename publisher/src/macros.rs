/// Builds a [`Listener`](crate::Listener) that forwards every notification to an async method
/// of a shared (`Arc`) handler.
#[macro_export]
macro_rules! listener {
    ($handler:ident.$method:ident) => {
        $crate::Listener::new({
            let handler = $handler.clone(); // Clone the handler
            move |id, value| {
                let handler = handler.clone(); // Clone inside the closure
                async move {
                    handler.$method(id, value).await; // Call the method on the handler
                }
            }
        })
    };
}
