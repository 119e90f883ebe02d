//! Built-in block components.
//!
//! Each component renders one block kind to a `<section>` tagged with the
//! block's CSS name and discriminator. Rendering is server-side only and
//! nothing hydrates the output, but leptos still leaves an empty `<!>`
//! comment where an optional field is absent. Browsers ignore it.

use crate::fragment::Fragment;
use crate::rich_text::rich_text_view;
use blockpress_core::{
    Asset, CallToActionSection, Feature, FeatureGridSection, HeroSection, TestimonialSection,
    TextSection,
};
use leptos::prelude::*;

pub fn render_hero(hero: &HeroSection) -> Fragment {
    let hero = hero.clone();
    Fragment::new(view! { <HeroBlock hero=hero /> }.to_html())
}

pub fn render_call_to_action(cta: &CallToActionSection) -> Fragment {
    let cta = cta.clone();
    Fragment::new(view! { <CallToActionBlock cta=cta /> }.to_html())
}

pub fn render_text(text: &TextSection) -> Fragment {
    let text = text.clone();
    Fragment::new(view! { <TextBlock text=text /> }.to_html())
}

pub fn render_feature_grid(grid: &FeatureGridSection) -> Fragment {
    let grid = grid.clone();
    Fragment::new(view! { <FeatureGridBlock grid=grid /> }.to_html())
}

pub fn render_testimonial(testimonial: &TestimonialSection) -> Fragment {
    let testimonial = testimonial.clone();
    Fragment::new(view! { <TestimonialBlock testimonial=testimonial /> }.to_html())
}

#[component]
fn HeroBlock(hero: HeroSection) -> impl IntoView {
    let HeroSection {
        heading,
        subheading,
        background_image,
        cta_label,
        cta_url,
    } = hero;

    view! {
        <section class="block block-hero" data-block="HeroSection">
            {background_image.map(|img| image(&img, "hero-background"))}
            <div class="hero-content">
                <h1>{heading}</h1>
                {subheading.map(|text| view! { <p class="subheading">{text}</p> })}
                {link_button(cta_label, cta_url)}
            </div>
        </section>
    }
}

#[component]
fn CallToActionBlock(cta: CallToActionSection) -> impl IntoView {
    let CallToActionSection {
        title,
        description,
        image: picture,
        button_label,
        button_url,
    } = cta;

    view! {
        <section class="block block-call-to-action" data-block="CallToActionSection">
            {picture.map(|img| image(&img, "cta-image"))}
            <div class="cta-content">
                <h2>{title}</h2>
                {description.map(|text| view! { <p>{text}</p> })}
                {link_button(button_label, button_url)}
            </div>
        </section>
    }
}

#[component]
fn TextBlock(text: TextSection) -> impl IntoView {
    let body = text.body.as_ref().map(rich_text_view);

    view! {
        <section class="block block-text" data-block="TextSection">
            {text.title.map(|title| view! { <h2>{title}</h2> })}
            <div class="rich-text">{body}</div>
        </section>
    }
}

#[component]
fn FeatureGridBlock(grid: FeatureGridSection) -> impl IntoView {
    let features = grid
        .features
        .into_iter()
        .map(|feature| {
            let Feature {
                title,
                description,
                icon,
            } = feature;
            view! {
                <li class="feature">
                    {icon.map(|img| image(&img, "feature-icon"))}
                    <h3>{title}</h3>
                    {description.map(|text| view! { <p>{text}</p> })}
                </li>
            }
        })
        .collect_view();

    view! {
        <section class="block block-feature-grid" data-block="FeatureGridSection">
            {grid.title.map(|title| view! { <h2>{title}</h2> })}
            <ul class="features">{features}</ul>
        </section>
    }
}

#[component]
fn TestimonialBlock(testimonial: TestimonialSection) -> impl IntoView {
    let TestimonialSection {
        quote,
        author,
        role,
        avatar,
    } = testimonial;

    view! {
        <section class="block block-testimonial" data-block="TestimonialSection">
            <figure>
                <blockquote>{quote}</blockquote>
                <figcaption>
                    {avatar.map(|img| image(&img, "avatar"))}
                    <span class="author">{author}</span>
                    {role.map(|role| view! { <span class="role">{role}</span> })}
                </figcaption>
            </figure>
        </section>
    }
}

/// `<img>` for an asset; dimensions only when the CMS knows them
pub(crate) fn image(asset: &Asset, class: &'static str) -> impl IntoView + use<> {
    let src = asset.url.clone();
    let alt = asset.alt_text().to_string();
    let width = asset.width.map(|w| w.to_string());
    let height = asset.height.map(|h| h.to_string());

    view! { <img class=class src=src alt=alt width=width height=height loading="lazy" /> }
}

/// Button link, rendered only when both label and a safe URL are present
fn link_button(label: Option<String>, url: Option<String>) -> Option<impl IntoView> {
    let label = label.filter(|l| !l.trim().is_empty())?;
    let href = url.as_deref().and_then(safe_href)?;
    Some(view! { <a class="button" href=href>{label}</a> })
}

/// Allow only web, mail and phone links, plus site-relative paths
pub(crate) fn safe_href(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let allowed = ["https://", "http://", "mailto:", "tel:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
        || (url.starts_with('/') && !url.starts_with("//"))
        || url.starts_with('#');

    allowed.then(|| url.to_string())
}
