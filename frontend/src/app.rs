use leptos::*;
use leptos_router::*;

use crate::pages::{callsheet::CallsheetPage, order_form::OrderFormPage};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <nav class="navbar">
                <a href="/" class="navbar-brand">"Callsheets"</a>
                <div class="navbar-nav">
                    <a href="/">"This week"</a>
                    <a href="/orders/new">"New order"</a>
                </div>
            </nav>
            <main class="container">
                <Routes>
                    <Route path="/" view=CallsheetPage />
                    <Route path="/orders/new" view=OrderFormPage />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="empty-state">
            <p>"Page not found"</p>
            <a href="/">"Back to the callsheet"</a>
        </div>
    }
}
