use storefront_ui::{Error, Page, PageConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="ru">
  <head>
    <meta charset="utf-8">
    <title>Mishka</title>
    <link rel="stylesheet" href="css/style.min.css">
    <style>.main-nav--closed > .main-nav__list { display: none; }</style>
  </head>
  <body class="page">
    <header class="page-header">
      <!-- <nav class="main-nav main-nav--opened"> -->
      <nav class="main-nav main-nav--closed main-nav--nojs">
        <a class="main-nav__logo" href="index.html"><img src="img/logo.svg" width="149" height="30" alt="Mishka"></a>
        <button class="main-nav__toggle" type="button"><span class="visually-hidden">Open menu</span></button>
        <ul class="main-nav__list site-list">
          <li class="site-list__item"><a href="catalog.html">Catalog</a></li>
          <li class="site-list__item site-list__item--active"><a>Hot deals</a></li>
        </ul>
      </nav>
    </header>
    <main>
      <section class="hero">
        <h1 class="visually-hidden">Fresh arrivals</h1>
        <ul class="hero__list">
          <li class="hero__item hero__item--active" id="hero-1"><picture><source type="image/webp" srcset="img/hero-1.webp"><img src="img/hero-1.jpg" alt="Knitted toys"></picture></li>
          <li class="hero__item" id="hero-2"><img src="img/hero-2.jpg" alt="Baskets"></li>
          <li class="hero__item" id="hero-3"><img src="img/hero-3.jpg" alt="Blankets"></li>
        </ul>
        <div class="hero__controls">
          <button class="hero__page-button hero__page-button--before" type="button" disabled><span class="visually-hidden">Previous</span></button>
          <ol class="hero__pagination">
            <li class="hero__pagination-item hero__pagination-item--active" id="dot-1"><span class="visually-hidden">1</span></li>
            <li class="hero__pagination-item" id="dot-2"><span class="visually-hidden">2</span></li>
            <li class="hero__pagination-item" id="dot-3"><span class="visually-hidden">3</span></li>
          </ol>
          <button class="hero__page-button hero__page-button--after" type="button"><span class="visually-hidden">Next</span></button>
        </div>
      </section>
      <form class="form" action="https://echo.example/" method="get">
        <fieldset class="form__group">
          <legend>Price</legend>
          <div class="form__slider no-ui-slider"></div>
          <label>from <input class="form__slider-min" type="number" name="min" value="0"></label>
          <label>to <input class="form__slider-max" type="number" name="max" value="900"></label>
        </fieldset>
        <button class="form__submit" type="submit">Show</button>
      </form>
    </main>
    <script src="js/vendor/nouislider.min.js"></script>
    <script>if (a < b && "</div>") { init(); }</script>
  </body>
</html>
"#;

#[test]
fn storefront_index_page_boots_and_reacts() -> storefront_ui::Result<()> {
    init_tracing();
    let mut page = Page::boot(INDEX_HTML, &PageConfig::default())?;

    page.click(".main-nav__toggle span")?;
    page.assert_class(".main-nav", "main-nav--opened", true)?;
    page.assert_class(".main-nav", "main-nav--nojs", true)?;

    page.click(".hero__page-button--after span")?;
    page.assert_class("#hero-2", "hero__item--active", true)?;
    page.assert_class("#dot-2", "hero__pagination-item--active", true)?;
    page.assert_disabled(".hero__page-button--before", false)?;

    page.click("#dot-3 span")?;
    page.assert_class("#hero-3", "hero__item--active", true)?;
    page.assert_disabled(".hero__page-button--after", true)?;

    page.commit_text(".form__slider-min", "150")?;
    page.commit_text(".form__slider-max", "5000")?;
    page.assert_value(".form__slider-min", "150")?;
    page.assert_value(".form__slider-max", "980")?;
    page.assert_text(".hero h1", "Fresh arrivals")?;
    Ok(())
}

#[test]
fn clicks_on_disabled_controls_do_not_bubble() -> storefront_ui::Result<()> {
    init_tracing();
    let mut page = Page::boot(INDEX_HTML, &PageConfig::default())?;
    page.click(".hero__page-button--before")?;
    page.assert_class("#hero-1", "hero__item--active", true)?;
    Ok(())
}

#[test]
fn renamed_markup_boots_through_toml_config() -> storefront_ui::Result<()> {
    init_tracing();
    let html = INDEX_HTML
        .replace("hero__item", "promo__slide")
        .replace("hero__pagination-item", "promo__dot");
    let config = PageConfig::from_toml_str(
        r#"
        [carousel]
        slide_selector = ".promo__slide"
        pagination_selector = ".promo__dot"
        slide_active_class = "promo__slide--active"
        pagination_active_class = "promo__dot--active"

        [price_range.slider]
        step = 10.0
        start = [50.0, 400.0]
        "#,
    )?;

    let mut page = Page::boot(&html, &config)?;
    page.assert_value(".form__slider-min", "50")?;
    page.assert_value(".form__slider-max", "400")?;

    page.click("#dot-2")?;
    page.assert_class("#hero-2", "promo__slide--active", true)?;

    page.commit_text(".form__slider-min", "123")?;
    page.assert_value(".form__slider-min", "120")?;
    Ok(())
}

#[test]
fn invalid_slider_options_are_a_config_error() {
    let result = PageConfig::from_toml_str(
        r#"
        [price_range.slider]
        range = { min = 500.0, max = 100.0 }
        "#,
    );
    assert!(matches!(result, Err(Error::Config(_))));

    let result = PageConfig::from_toml_str("[dropdown]\nnav_selector = 3\n");
    assert!(matches!(result, Err(Error::Config(_))));
}
