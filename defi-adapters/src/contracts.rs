//! Shared Solidity contract bindings.
//!
//! Uses alloy's `sol!` macro to generate type-safe ABI encoders/decoders
//! for the contracts the adapters read from or build calls against.

use alloy::sol;

sol! {
    /// Angle Transmuter swap entry points.
    interface ITransmuter {
        function swapExactInput(
            uint256 amountIn, uint256 amountOutMin, address tokenIn, address tokenOut,
            address to, uint256 deadline
        ) external returns (uint256 amountOut);

        function swapExactOutput(
            uint256 amountOut, uint256 amountInMax, address tokenIn, address tokenOut,
            address to, uint256 deadline
        ) external returns (uint256 amountIn);
    }

    #[sol(rpc)]
    interface IERC20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}
