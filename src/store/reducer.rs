use crate::mvi::Reducer;
use crate::store::action::StoreAction;
use crate::store::state::StoreState;

pub struct StoreReducer;

impl Reducer for StoreReducer {
    type State = StoreState;
    type Action = StoreAction;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State {
        match action {
            StoreAction::ListArticles(page) => StoreState {
                articles: page.articles,
                articles_count: page.articles_count,
                ..state
            },
            StoreAction::ArticleEntryReplace { slug, data } => {
                let mut articles = state.articles;
                match articles.iter().position(|a| a.slug == slug) {
                    Some(idx) => articles[idx] = data,
                    None => articles.insert(0, data),
                }
                StoreState { articles, ..state }
            }
            StoreAction::CredentialsNew(credentials) => {
                let credentials = credentials.normalized();
                let articles = if credentials.is_authenticated() {
                    state.articles
                } else {
                    // A logged-out viewer cannot have favorites
                    state
                        .articles
                        .into_iter()
                        .map(|mut a| {
                            a.favorited = false;
                            a
                        })
                        .collect()
                };
                StoreState {
                    credentials,
                    articles,
                    ..state
                }
            }
            StoreAction::CredentialsUpdate(patch) => StoreState {
                credentials: state.credentials.merged(patch),
                ..state
            },
        }
    }
}
