//! Example: two pages on one host
//!
//! Run with `RUST_LOG=fos_page=debug` to watch the lifecycle.

use std::rc::{Rc, Weak};
use std::time::Duration;

use fos_dom::Document;
use fos_page::{
    Action, FadeDisplayer, Page, PageDisplayer, PageMaster, PageParams, SimpleHost,
};
use smol::LocalExecutor;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let ex = Rc::new(LocalExecutor::new());
    let host = SimpleHost::new();
    let doc = Document::new("app://demo");
    let displayer: Rc<dyn PageDisplayer> = Rc::new(FadeDisplayer::new(Duration::from_millis(150)));

    host.error().add(|_, fault| {
        eprintln!("[{}] {:#}", fault.page.name(), fault.error);
    });

    let app: Rc<dyn PageMaster> = host.clone();
    let app: Weak<dyn PageMaster> = Rc::downgrade(&app);

    let mut pages = Vec::new();
    for name in ["home", "about"] {
        let element = doc.create_element(Page::TAG_NAME);
        doc.body().append_child(&element)?;

        let page = Page::new(PageParams {
            app: app.clone(),
            action: Action::from_async(|page: &Rc<Page>| {
                let page = Rc::clone(page);
                async move {
                    smol::Timer::after(Duration::from_millis(50)).await;
                    page.element().append_text(&format!("Welcome to {}", page.name()))?;
                    page.data().set("ready", "1");
                    Ok(())
                }
            }),
            element,
            displayer: Rc::clone(&displayer),
            name: name.to_string(),
            data: Default::default(),
            executor: Rc::clone(&ex),
        });
        page.load.add(|page, data| {
            println!("{} loaded: {:?}", page.name(), data);
        });
        page.shown.add(|page, _| println!("{} shown", page.name()));
        pages.push(page);
    }

    smol::block_on(ex.run(async {
        for page in &pages {
            if let Some(first) = page.initial_load() {
                first.wait().await?;
            }
        }

        for page in &pages {
            page.show().await?;
            host.set_current_page(Some(Rc::clone(page)));
            println!("  text: {:?}", page.element().text_content());
        }

        for page in &pages {
            page.close().await;
        }
        anyhow::Ok(())
    }))?;

    println!("fOS Page v{} done; body has {} children", fos_page::VERSION, doc.body().children().len());
    Ok(())
}
