use yew::{
  AttrValue,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct LoadingViewProps {
  #[prop_or(AttrValue::Static("Loading…"))]
  pub label: AttrValue
}

#[function_component(LoadingView)]
pub fn loading_view(
  props: &LoadingViewProps
) -> Html {
  html! {
      <div class="state state-loading" role="status">
          <span class="spinner" />
          <span>{ props.label.clone() }</span>
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct ErrorViewProps {
  pub message: AttrValue
}

#[function_component(ErrorView)]
pub fn error_view(
  props: &ErrorViewProps
) -> Html {
  html! {
      <div class="state state-error" role="alert">
          <div class="state-title">{ "Something went wrong" }</div>
          <div class="state-detail">{ props.message.clone() }</div>
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct EmptyViewProps {
  pub message: AttrValue
}

#[function_component(EmptyView)]
pub fn empty_view(
  props: &EmptyViewProps
) -> Html {
  html! {
      <div class="state state-empty">{ props.message.clone() }</div>
  }
}
