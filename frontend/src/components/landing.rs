//! 访客页面：首页、关于、价格（纯静态内容）

use leptos::prelude::*;

use crate::web::route::SIGNUP_PATH;
use crate::web::router::Link;

struct Feature {
    title: &'static str,
    description: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        title: "Fast matching",
        description: "Filter creators by category, audience size and score, then invite them in one click.",
    },
    Feature {
        title: "Direct messaging",
        description: "Once an agreement is in place, brand and creator talk in the same thread.",
    },
    Feature {
        title: "Transparent scoring",
        description: "Engagement, average likes and post history are visible before you commit a budget.",
    },
];

const STATS: &[(&str, &str)] = &[
    ("2,500+", "Creators"),
    ("400+", "Brands"),
    ("1,200+", "Campaigns"),
];

struct Plan {
    name: &'static str,
    price: &'static str,
    perks: &'static [&'static str],
    highlighted: bool,
}

const PLANS: &[Plan] = &[
    Plan {
        name: "Starter",
        price: "Free",
        perks: &["1 active campaign", "Creator search", "Basic messaging"],
        highlighted: false,
    },
    Plan {
        name: "Growth",
        price: "$49 / month",
        perks: &["10 active campaigns", "Saved filters", "Priority support"],
        highlighted: true,
    },
    Plan {
        name: "Enterprise",
        price: "Contact us",
        perks: &["Unlimited campaigns", "Dedicated manager", "Custom reporting"],
        highlighted: false,
    },
];

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="hero min-h-[70vh] bg-gradient-to-br from-primary to-secondary text-primary-content">
            <div class="hero-content text-center">
                <div class="max-w-2xl">
                    <h1 class="text-5xl font-extrabold">"Find the right voice for your brand"</h1>
                    <p class="py-6 text-lg">
                        "Adfluencer brings advertisers and content creators together: publish a campaign, invite creators, agree and talk, all in one place."
                    </p>
                    <Link to=SIGNUP_PATH class="btn btn-accent btn-lg">"Get started"</Link>
                </div>
            </div>
        </div>

        <section class="max-w-6xl mx-auto py-16 px-4 grid gap-6 md:grid-cols-3">
            {FEATURES
                .iter()
                .map(|f| {
                    view! {
                        <div class="card bg-base-100 shadow-md">
                            <div class="card-body">
                                <h3 class="card-title">{f.title}</h3>
                                <p class="text-base-content/70">{f.description}</p>
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </section>

        <section class="flex justify-center pb-16">
            <div class="stats shadow stats-vertical md:stats-horizontal">
                {STATS
                    .iter()
                    .map(|&(value, label)| {
                        view! {
                            <div class="stat place-items-center">
                                <div class="stat-value text-primary">{value}</div>
                                <div class="stat-title">{label}</div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="max-w-4xl mx-auto py-16 px-4 space-y-8">
            <h1 class="text-4xl font-bold">"About Adfluencer"</h1>
            <p class="text-lg text-base-content/80">
                "Adfluencer started as a thesis project on making influencer marketing measurable for small brands. "
                "Advertisers publish campaigns with a budget and a creator limit; creators apply or accept invitations, "
                "and every accepted agreement opens a private conversation."
            </p>
            <div class="grid gap-6 md:grid-cols-2">
                <div class="card bg-base-200">
                    <div class="card-body">
                        <h3 class="card-title">"For advertisers"</h3>
                        <p>"Search creators by category, follower range and score, and manage applications per campaign."</p>
                    </div>
                </div>
                <div class="card bg-base-200">
                    <div class="card-body">
                        <h3 class="card-title">"For creators"</h3>
                        <p>"Browse open campaigns, track your applications and respond to invitations from brands."</p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn PricingPage() -> impl IntoView {
    view! {
        <div class="max-w-6xl mx-auto py-16 px-4">
            <h1 class="text-4xl font-bold text-center mb-12">"Pricing"</h1>
            <div class="grid gap-6 md:grid-cols-3">
                {PLANS
                    .iter()
                    .map(|plan| {
                        let class = if plan.highlighted {
                            "card bg-primary text-primary-content shadow-xl"
                        } else {
                            "card bg-base-100 shadow-md"
                        };
                        view! {
                            <div class=class>
                                <div class="card-body">
                                    <h2 class="card-title">{plan.name}</h2>
                                    <p class="text-3xl font-bold">{plan.price}</p>
                                    <ul class="list-disc list-inside space-y-1">
                                        {plan.perks.iter().map(|p| view! { <li>{*p}</li> }).collect_view()}
                                    </ul>
                                    <div class="card-actions justify-end">
                                        <Link to=SIGNUP_PATH class="btn">"Choose"</Link>
                                    </div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
