use super::*;

#[test]
fn toggle_alternates_between_closed_and_opened() -> Result<()> {
    let mut h = boot(2, 0)?;
    for click in 1..=5 {
        h.click(".main-nav__toggle")?;
        let opened = click % 2 == 1;
        h.assert_class(".main-nav", "main-nav--opened", opened)?;
        h.assert_class(".main-nav", "main-nav--closed", !opened)?;
    }
    Ok(())
}

#[test]
fn other_clicks_inside_the_nav_leave_it_alone() -> Result<()> {
    let mut h = boot(2, 0)?;
    h.click("#catalog-link")?;
    h.click(".main-nav__list")?;
    h.assert_class(".main-nav", "main-nav--closed", true)?;
    h.assert_class(".main-nav", "main-nav--opened", false)?;
    Ok(())
}

#[test]
fn page_can_start_with_the_menu_open() -> Result<()> {
    let html = storefront_html(2, 0).replace("main-nav--closed", "main-nav--opened");
    let mut h = Page::boot(&html, &PageConfig::default())?;
    assert_eq!(
        h.dropdown().map(|dropdown| dropdown.is_open(h.dom())).transpose()?,
        Some(true)
    );
    h.click(".main-nav__toggle")?;
    h.assert_class(".main-nav", "main-nav--closed", true)?;
    Ok(())
}

#[test]
fn toggle_keeps_unrelated_classes() -> Result<()> {
    let mut h = boot(2, 0)?;
    h.click(".main-nav__toggle")?;
    h.click(".main-nav__toggle")?;
    h.assert_class(".main-nav", "main-nav", true)?;
    h.assert_exists("nav.main-nav.main-nav--closed")?;
    Ok(())
}
