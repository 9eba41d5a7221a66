use crate::define_index_newtype;
use crate::solver::solution::route::SolutionRoute;

define_index_newtype!(RouteIdx, SolutionRoute);
